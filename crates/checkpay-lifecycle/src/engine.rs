//! The Check Lifecycle Engine.
//!
//! Every transition runs the same steps:
//! 1. Load the record (`NotFound` if absent)
//! 2. Check the transition table (`IllegalTransition` if not allowed)
//! 3. Save the new state with a version check (`StaleRecord` on a race)
//! 4. Append one [`TransitionRecord`] to the audit log
//!
//! Steps 1-3 either all happen or the stored record is untouched. Step 4 is
//! not coupled to the state change: an audit failure is logged and handed
//! back as [`TransitionOutcome::audit_warning`], the new state stays.

use checkpay_types::{
    CheckPayment, CheckPaymentError, CheckPaymentId, CheckPaymentUpdate, EngineConfig,
    NewCheckPayment, PaymentId, Result, Transition, TransitionContext, TransitionRecord,
};

use crate::collaborators::{AuditLog, CheckStore, CurrencyProvider};

/// Result of a successful transition.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The record as saved.
    pub check: CheckPayment,
    /// The audit entry describing the transition.
    pub record: TransitionRecord,
    /// Set when the audit log rejected `record`.
    pub audit_warning: Option<CheckPaymentError>,
}

impl TransitionOutcome {
    /// `true` if the audit record was written.
    #[must_use]
    pub fn is_audited(&self) -> bool {
        self.audit_warning.is_none()
    }
}

/// Guards and applies check lifecycle transitions.
pub struct CheckLifecycleEngine<S, A, C> {
    store: S,
    audit: A,
    currency: C,
    config: EngineConfig,
}

impl<S, A, C> CheckLifecycleEngine<S, A, C>
where
    S: CheckStore,
    A: AuditLog,
    C: CurrencyProvider,
{
    /// # Errors
    /// Returns `Configuration` if `config` is invalid.
    pub fn new(store: S, audit: A, currency: C, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            audit,
            currency,
            config,
        })
    }

    // -- records -------------------------------------------------------------

    /// Validate and store a new draft record.
    ///
    /// The currency defaults to the journal company's currency. Nothing is
    /// stored if validation fails.
    pub fn create(&self, new: NewCheckPayment, ctx: &TransitionContext) -> Result<CheckPayment> {
        let default_currency = self.currency.default_currency(new.journal.company);
        let check = CheckPayment::create(new, default_currency, &self.config, ctx)?;
        let check = self.store.insert(check)?;
        tracing::info!(
            check = %check.id(),
            amount = %check.amount(),
            currency = %check.currency(),
            actor = %ctx.actor,
            created_at = %check.created_at(),
            "Check payment created"
        );
        Ok(check)
    }

    pub fn get(&self, id: CheckPaymentId) -> Result<CheckPayment> {
        self.store.load(id)
    }

    /// All records in listing order.
    pub fn list(&self) -> Result<Vec<CheckPayment>> {
        self.store.list()
    }

    /// Patch mutable fields. Applied wholly or not at all.
    ///
    /// An empty update returns the stored record without saving it, so it
    /// never advances the version.
    pub fn update(&self, id: CheckPaymentId, update: &CheckPaymentUpdate) -> Result<CheckPayment> {
        let mut check = self.store.load(id)?;
        if update.is_empty() {
            return Ok(check);
        }
        if let Err(err) = check.apply_update(update, &self.config) {
            tracing::debug!(
                check = %id,
                state = %check.state(),
                identifying = update.touches_identifying_fields(),
                error = %err,
                "Update rejected"
            );
            return Err(err);
        }
        let check = self.store.save(check)?;
        tracing::debug!(
            check = %id,
            version = check.version(),
            identifying = update.touches_identifying_fields(),
            "Check payment updated"
        );
        Ok(check)
    }

    /// Store a new draft copied from `id` under a new check name and number.
    pub fn duplicate(
        &self,
        id: CheckPaymentId,
        check_name: String,
        check_number: u64,
        ctx: &TransitionContext,
    ) -> Result<CheckPayment> {
        let source = self.store.load(id)?;
        let copy = source.duplicate(check_name, check_number, &self.config, ctx)?;
        let copy = self.store.insert(copy)?;
        tracing::info!(source = %id, check = %copy.id(), "Check payment duplicated");
        Ok(copy)
    }

    /// Cascade from the owning payment: remove every record linked to it.
    pub fn payment_deleted(&self, payment: PaymentId) -> Result<Vec<CheckPaymentId>> {
        let removed = self.store.delete_for_payment(payment)?;
        if !removed.is_empty() {
            tracing::info!(
                payment = %payment,
                removed = removed.len(),
                "Linked check payments removed"
            );
        }
        Ok(removed)
    }

    // -- transitions -----------------------------------------------------------

    /// DRAFT → RECEIVED.
    pub fn receive(
        &self,
        id: CheckPaymentId,
        ctx: &TransitionContext,
    ) -> Result<TransitionOutcome> {
        self.transition(id, Transition::Receive, ctx)
    }

    /// RECEIVED → DEPOSITED.
    pub fn deposit(
        &self,
        id: CheckPaymentId,
        ctx: &TransitionContext,
    ) -> Result<TransitionOutcome> {
        self.transition(id, Transition::Deposit, ctx)
    }

    /// DRAFT → ISSUED.
    pub fn issue(
        &self,
        id: CheckPaymentId,
        ctx: &TransitionContext,
    ) -> Result<TransitionOutcome> {
        self.transition(id, Transition::Issue, ctx)
    }

    /// RECEIVED | DEPOSITED | ISSUED → RETURNED.
    pub fn return_check(
        &self,
        id: CheckPaymentId,
        ctx: &TransitionContext,
    ) -> Result<TransitionOutcome> {
        self.transition(id, Transition::Return, ctx)
    }

    /// DEPOSITED | ISSUED → POSTED, stamping the posted date.
    pub fn post(
        &self,
        id: CheckPaymentId,
        ctx: &TransitionContext,
    ) -> Result<TransitionOutcome> {
        self.transition(id, Transition::Post, ctx)
    }

    /// DRAFT | RECEIVED | ISSUED | RETURNED → CANCELLED.
    pub fn cancel(
        &self,
        id: CheckPaymentId,
        ctx: &TransitionContext,
    ) -> Result<TransitionOutcome> {
        self.transition(id, Transition::Cancel, ctx)
    }

    /// Run `transition` on one record.
    pub fn transition(
        &self,
        id: CheckPaymentId,
        transition: Transition,
        ctx: &TransitionContext,
    ) -> Result<TransitionOutcome> {
        let mut check = self.store.load(id)?;
        let record = match check.apply_transition(transition, ctx) {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(
                    check = %id,
                    transition = %transition,
                    state = %check.state(),
                    "Transition rejected"
                );
                return Err(err);
            }
        };
        let check = self.store.save(check)?;

        tracing::info!(
            check = %id,
            transition = %transition,
            from = %record.from,
            to = %record.to,
            actor = %record.actor,
            "Check payment transitioned"
        );

        let audit_warning = match self.audit.append(&record) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(
                    check = %id,
                    transition = %transition,
                    digest = %record.digest_hex(),
                    error = %err,
                    "Audit log append failed; state change kept"
                );
                Some(err)
            }
        };

        Ok(TransitionOutcome {
            check,
            record,
            audit_warning,
        })
    }

    // -- accessors ---------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn audit(&self) -> &A {
        &self.audit
    }
}
