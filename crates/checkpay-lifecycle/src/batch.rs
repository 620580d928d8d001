//! Batch transitions.
//!
//! A batch is a convenience loop, not a transaction: each record is loaded,
//! checked and saved on its own, and a failure on one record neither stops
//! the loop nor undoes records already transitioned.

use checkpay_types::{CheckPaymentError, CheckPaymentId, Result, Transition, TransitionContext};

use crate::collaborators::{AuditLog, CheckStore, CurrencyProvider};
use crate::engine::{CheckLifecycleEngine, TransitionOutcome};

/// Outcome for one record of a batch.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: CheckPaymentId,
    pub result: Result<TransitionOutcome>,
}

/// Per-record outcomes, in request order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub transition: Transition,
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.result.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Failed records with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (CheckPaymentId, &CheckPaymentError)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().err().map(|err| (item.id, err)))
    }
}

impl<S, A, C> CheckLifecycleEngine<S, A, C>
where
    S: CheckStore,
    A: AuditLog,
    C: CurrencyProvider,
{
    /// Apply `transition` to every id, independently.
    ///
    /// # Errors
    /// Returns `BatchTooLarge` (before touching any record) if `ids` exceeds
    /// `max_batch_size`. Per-record failures are reported in the
    /// [`BatchReport`], never as the call's error.
    pub fn apply_batch(
        &self,
        ids: &[CheckPaymentId],
        transition: Transition,
        ctx: &TransitionContext,
    ) -> Result<BatchReport> {
        let limit = self.config().max_batch_size;
        if ids.len() > limit {
            return Err(CheckPaymentError::BatchTooLarge {
                requested: ids.len(),
                limit,
            });
        }

        let items: Vec<BatchItem> = ids
            .iter()
            .map(|&id| {
                let result = self.transition(id, transition, ctx);
                if let Err(err) = &result {
                    tracing::warn!(
                        check = %id,
                        transition = %transition,
                        error = %err,
                        "Batch item failed"
                    );
                }
                BatchItem { id, result }
            })
            .collect();

        let report = BatchReport { transition, items };
        tracing::info!(
            transition = %transition,
            requested = ids.len(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch transition complete"
        );
        Ok(report)
    }
}
