//! Error types for the checkpay lifecycle engine.
//!
//! All errors use the `CP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Field validation errors
//! - 2xx: Lifecycle (transition) errors
//! - 3xx: Lookup errors
//! - 4xx: Persistence errors
//! - 5xx: Audit log errors
//! - 9xx: Configuration / general errors

use thiserror::Error;

use crate::{CheckField, CheckPaymentId, CheckState, Transition};

/// Central error enum for all checkpay operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckPaymentError {
    // =================================================================
    // Validation Errors (1xx)
    // =================================================================
    /// A field-level invariant would be violated by the write.
    #[error("CP_ERR_100: Invalid {field}: {reason}")]
    Validation { field: CheckField, reason: String },

    /// A batch call named more records than the configured limit.
    #[error("CP_ERR_101: Batch of {requested} records exceeds limit of {limit}")]
    BatchTooLarge { requested: usize, limit: usize },

    // =================================================================
    // Lifecycle Errors (2xx)
    // =================================================================
    /// The requested transition is not legal from the current state.
    #[error("CP_ERR_200: Cannot {transition} a check in state {from} (target {})", .transition.target())]
    IllegalTransition {
        transition: Transition,
        from: CheckState,
    },

    // =================================================================
    // Lookup Errors (3xx)
    // =================================================================
    /// No record with this identity exists in the store.
    #[error("CP_ERR_300: Check payment not found: {0}")]
    NotFound(CheckPaymentId),

    // =================================================================
    // Persistence Errors (4xx)
    // =================================================================
    /// The record changed since it was loaded (optimistic concurrency).
    #[error("CP_ERR_400: Stale record {id}: loaded version {expected}, stored version {actual}")]
    StaleRecord {
        id: CheckPaymentId,
        expected: u64,
        actual: u64,
    },

    /// A record with this identity already exists.
    #[error("CP_ERR_401: Check payment already exists: {0}")]
    DuplicateRecord(CheckPaymentId),

    /// The persistence collaborator failed.
    #[error("CP_ERR_402: Storage error: {0}")]
    Storage(String),

    // =================================================================
    // Audit Errors (5xx)
    // =================================================================
    /// The audit log collaborator could not append a record.
    #[error("CP_ERR_500: Audit log unavailable: {0}")]
    AuditUnavailable(String),

    // =================================================================
    // General (9xx)
    // =================================================================
    /// Configuration error (invalid config, missing fields, etc.).
    #[error("CP_ERR_900: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("CP_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

impl CheckPaymentError {
    /// Shorthand for a [`CheckPaymentError::Validation`].
    pub fn validation(field: CheckField, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// The offending field, for validation errors.
    #[must_use]
    pub fn field(&self) -> Option<CheckField> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CheckPaymentError>;

impl From<serde_json::Error> for CheckPaymentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
