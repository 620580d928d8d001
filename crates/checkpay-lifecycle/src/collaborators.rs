//! Contracts the engine relies on but does not implement.
//!
//! - [`CheckStore`]: persistence, with optimistic concurrency on `save`
//! - [`CurrencyProvider`]: default currency for new records
//! - [`AuditLog`]: append-only sink for transition records
//!
//! [`crate::memory`] has in-process implementations of all three.

use checkpay_types::{
    CheckPayment, CheckPaymentId, CompanyId, Currency, PaymentId, Result, TransitionRecord,
};

/// Persistence for check payment records.
///
/// Implementations must make `save` a compare-and-swap on the record's
/// version: a transition reads the state, validates it and writes the new
/// state, and two callers racing from the same stale read must not both win.
pub trait CheckStore: Send + Sync {
    /// Store a new record.
    ///
    /// # Errors
    /// `DuplicateRecord` if the id is already present.
    fn insert(&self, check: CheckPayment) -> Result<CheckPayment>;

    /// # Errors
    /// `NotFound` if no record has this id.
    fn load(&self, id: CheckPaymentId) -> Result<CheckPayment>;

    /// Replace the stored record and return it with its version advanced.
    ///
    /// # Errors
    /// `NotFound` if the record vanished, `StaleRecord` if `check.version()`
    /// is not the stored version.
    fn save(&self, check: CheckPayment) -> Result<CheckPayment>;

    /// Remove every record owned by `payment`, returning their ids.
    fn delete_for_payment(&self, payment: PaymentId) -> Result<Vec<CheckPaymentId>>;

    /// All records, payment date descending then check name descending.
    fn list(&self) -> Result<Vec<CheckPayment>>;
}

/// Source of the default currency for new records.
pub trait CurrencyProvider: Send + Sync {
    /// Currency of `company`. Treated as authoritative.
    fn default_currency(&self, company: CompanyId) -> Currency;
}

/// Append-only audit trail.
pub trait AuditLog: Send + Sync {
    /// # Errors
    /// `AuditUnavailable` if the record could not be written.
    fn append(&self, record: &TransitionRecord) -> Result<()>;
}
