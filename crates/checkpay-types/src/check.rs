//! # Check payment record
//!
//! [`CheckPayment`] is the entity the lifecycle engine guards. It is built by
//! composition: the monetary fields every payment instrument shares live in
//! [`PaymentFields`], the check's identifying data in [`CheckIdentity`], and
//! the record adds state, references and bookkeeping around them.
//!
//! ## Invariants (checked on every write)
//!
//! - `amount >= 0`, in every state.
//! - `check_name`, `check_number`, `check_issue_date`, `check_payment_date`
//!   are writable only while `state == Draft`.
//! - The journal must be of an allowed kind (bank or cash by default).
//! - `state` changes only through [`CheckPayment::apply_transition`].
//!
//! Every mutator validates before it writes, so a rejected call leaves the
//! record exactly as it was.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    BankAccountId, BankId, CheckPaymentError, CheckPaymentId, CheckState, CompanyId, EngineConfig,
    JournalId, PartnerId, PaymentId, Result, Transition, TransitionContext, TransitionRecord,
};

// ---------------------------------------------------------------------------
// References to collaborator records
// ---------------------------------------------------------------------------

/// Currency unit, by code (e.g. `"USD"`). Codes are not validated here; the
/// currency collaborator is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(pub String);

impl Currency {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger journal types. Checks may only post against bank or cash journals
/// unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalKind {
    Bank,
    Cash,
    Sale,
    Purchase,
    General,
}

impl fmt::Display for JournalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bank => "bank",
            Self::Cash => "cash",
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::General => "general",
        };
        f.write_str(s)
    }
}

/// Reference to the journal a check posts against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRef {
    pub id: JournalId,
    pub kind: JournalKind,
    /// Company owning the journal; the record's company follows from it.
    pub company: CompanyId,
}

impl JournalRef {
    #[must_use]
    pub fn new(kind: JournalKind, company: CompanyId) -> Self {
        Self {
            id: JournalId::new(),
            kind,
            company,
        }
    }
}

/// A bank, as seen through a bank account reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRef {
    pub id: BankId,
    pub name: String,
}

/// Reference to the payer/payee bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccountRef {
    pub id: BankAccountId,
    pub acc_number: String,
    pub bank: Option<BankRef>,
}

// ---------------------------------------------------------------------------
// CheckField
// ---------------------------------------------------------------------------

/// Names of the guarded fields, used to point validation errors at the
/// offending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckField {
    Amount,
    Journal,
    CheckName,
    CheckNumber,
    CheckIssueDate,
    CheckPaymentDate,
}

impl CheckField {
    /// Identifying fields, locked once the record leaves draft.
    pub const IDENTIFYING: [Self; 4] = [
        Self::CheckName,
        Self::CheckNumber,
        Self::CheckIssueDate,
        Self::CheckPaymentDate,
    ];
}

impl fmt::Display for CheckField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Amount => "amount",
            Self::Journal => "journal",
            Self::CheckName => "check_name",
            Self::CheckNumber => "check_number",
            Self::CheckIssueDate => "check_issue_date",
            Self::CheckPaymentDate => "check_payment_date",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// PaymentFields — shared monetary fields
// ---------------------------------------------------------------------------

/// Monetary fields shared by every payment instrument, with their one rule:
/// the amount is never negative.
///
/// Deserialization runs the amount check, so a stored record with a
/// negative amount fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPaymentFields")]
pub struct PaymentFields {
    partner: Option<PartnerId>,
    amount: Decimal,
    currency: Currency,
    posted_date: Option<NaiveDate>,
    journal: JournalRef,
}

impl PaymentFields {
    fn new(
        partner: Option<PartnerId>,
        amount: Decimal,
        currency: Currency,
        journal: JournalRef,
        config: &EngineConfig,
    ) -> Result<Self> {
        check_amount(amount)?;
        check_journal(&journal, config)?;
        Ok(Self {
            partner,
            amount,
            currency,
            posted_date: None,
            journal,
        })
    }
}

#[derive(Deserialize)]
struct RawPaymentFields {
    partner: Option<PartnerId>,
    amount: Decimal,
    currency: Currency,
    posted_date: Option<NaiveDate>,
    journal: JournalRef,
}

impl TryFrom<RawPaymentFields> for PaymentFields {
    type Error = CheckPaymentError;

    fn try_from(raw: RawPaymentFields) -> Result<Self> {
        check_amount(raw.amount)?;
        Ok(Self {
            partner: raw.partner,
            amount: raw.amount,
            currency: raw.currency,
            posted_date: raw.posted_date,
            journal: raw.journal,
        })
    }
}

fn check_amount(amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(CheckPaymentError::validation(
            CheckField::Amount,
            format!("the payment amount cannot be negative (got {amount})"),
        ));
    }
    Ok(())
}

fn check_journal(journal: &JournalRef, config: &EngineConfig) -> Result<()> {
    if !config.allowed_journal_kinds.contains(&journal.kind) {
        return Err(CheckPaymentError::validation(
            CheckField::Journal,
            format!(
                "journal {} is of kind {}, expected one of {:?}",
                journal.id, journal.kind, config.allowed_journal_kinds
            ),
        ));
    }
    Ok(())
}

fn check_name_value(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CheckPaymentError::validation(
            CheckField::CheckName,
            "check name is required",
        ));
    }
    Ok(())
}

fn check_number_value(number: u64) -> Result<()> {
    if number == 0 {
        return Err(CheckPaymentError::validation(
            CheckField::CheckNumber,
            "check number is required",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CheckIdentity — fields printed on the physical check
// ---------------------------------------------------------------------------

/// Identifying data of the physical check. Editable only in draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCheckIdentity")]
pub struct CheckIdentity {
    name: String,
    number: u64,
    issue_date: NaiveDate,
    /// Date the check may be cashed (post-dated checks).
    payment_date: NaiveDate,
}

#[derive(Deserialize)]
struct RawCheckIdentity {
    name: String,
    number: u64,
    issue_date: NaiveDate,
    payment_date: NaiveDate,
}

impl TryFrom<RawCheckIdentity> for CheckIdentity {
    type Error = CheckPaymentError;

    fn try_from(raw: RawCheckIdentity) -> Result<Self> {
        check_name_value(&raw.name)?;
        check_number_value(raw.number)?;
        Ok(Self {
            name: raw.name,
            number: raw.number,
            issue_date: raw.issue_date,
            payment_date: raw.payment_date,
        })
    }
}

// ---------------------------------------------------------------------------
// Creation and update inputs
// ---------------------------------------------------------------------------

/// Input for creating a check payment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCheckPayment {
    pub partner: Option<PartnerId>,
    pub amount: Decimal,
    /// Falls back to the currency collaborator's default when absent.
    pub currency: Option<Currency>,
    pub journal: JournalRef,
    pub check_name: String,
    pub check_number: u64,
    /// Defaults to the creation date.
    pub check_issue_date: Option<NaiveDate>,
    pub check_payment_date: NaiveDate,
    pub bank_account: Option<BankAccountRef>,
    pub payment: Option<PaymentId>,
}

/// A partial update. `None` leaves a field alone; for optional references,
/// `Some(None)` clears the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPaymentUpdate {
    pub partner: Option<Option<PartnerId>>,
    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub journal: Option<JournalRef>,
    pub check_name: Option<String>,
    pub check_number: Option<u64>,
    pub check_issue_date: Option<NaiveDate>,
    pub check_payment_date: Option<NaiveDate>,
    pub bank_account: Option<Option<BankAccountRef>>,
    pub payment: Option<Option<PaymentId>>,
}

impl CheckPaymentUpdate {
    /// Does this update touch any identifying field?
    #[must_use]
    pub fn touches_identifying_fields(&self) -> bool {
        self.check_name.is_some()
            || self.check_number.is_some()
            || self.check_issue_date.is_some()
            || self.check_payment_date.is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// CheckPayment
// ---------------------------------------------------------------------------

/// A check used as a payment instrument, tracked through clearing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPayment {
    id: CheckPaymentId,
    /// Display name of the record (not the name on the check).
    name: String,
    state: CheckState,
    payment_fields: PaymentFields,
    check: CheckIdentity,
    bank_account: Option<BankAccountRef>,
    /// Owning payment; deleting it cascades to this record.
    payment: Option<PaymentId>,
    /// Optimistic-concurrency version, advanced by the store on every save.
    version: u64,
    created_at: DateTime<Utc>,
}

impl CheckPayment {
    /// Validate `new` and build a draft record.
    ///
    /// # Errors
    /// Returns `Validation` naming the first offending field.
    pub fn create(
        new: NewCheckPayment,
        default_currency: Currency,
        config: &EngineConfig,
        ctx: &TransitionContext,
    ) -> Result<Self> {
        let payment_fields = PaymentFields::new(
            new.partner,
            new.amount,
            new.currency.unwrap_or(default_currency),
            new.journal,
            config,
        )?;
        check_name_value(&new.check_name)?;
        check_number_value(new.check_number)?;

        Ok(Self {
            id: CheckPaymentId::new(),
            name: config.draft_name.clone(),
            state: CheckState::Draft,
            payment_fields,
            check: CheckIdentity {
                name: new.check_name,
                number: new.check_number,
                issue_date: new.check_issue_date.unwrap_or_else(|| ctx.effective_date()),
                payment_date: new.check_payment_date,
            },
            bank_account: new.bank_account,
            payment: new.payment,
            version: 0,
            created_at: ctx.at,
        })
    }

    /// Build a fresh draft copying the commercial terms of `self`.
    ///
    /// State, posted date, bank account and the check's name, number and
    /// issue date are not carried over.
    ///
    /// # Errors
    /// Returns `Validation` if the new name/number are blank or the copied
    /// journal is no longer allowed by `config`.
    pub fn duplicate(
        &self,
        check_name: String,
        check_number: u64,
        config: &EngineConfig,
        ctx: &TransitionContext,
    ) -> Result<Self> {
        let new = NewCheckPayment {
            partner: self.payment_fields.partner,
            amount: self.payment_fields.amount,
            currency: Some(self.payment_fields.currency.clone()),
            journal: self.payment_fields.journal.clone(),
            check_name,
            check_number,
            check_issue_date: None,
            check_payment_date: self.check.payment_date,
            bank_account: None,
            payment: self.payment,
        };
        Self::create(new, self.payment_fields.currency.clone(), config, ctx)
    }

    // -- accessors ---------------------------------------------------------

    #[must_use]
    pub fn id(&self) -> CheckPaymentId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn state(&self) -> CheckState {
        self.state
    }

    #[must_use]
    pub fn partner(&self) -> Option<PartnerId> {
        self.payment_fields.partner
    }

    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.payment_fields.amount
    }

    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.payment_fields.currency
    }

    #[must_use]
    pub fn posted_date(&self) -> Option<NaiveDate> {
        self.payment_fields.posted_date
    }

    #[must_use]
    pub fn journal(&self) -> &JournalRef {
        &self.payment_fields.journal
    }

    /// Company of the record, read through its journal.
    #[must_use]
    pub fn company(&self) -> CompanyId {
        self.payment_fields.journal.company
    }

    #[must_use]
    pub fn check_name(&self) -> &str {
        &self.check.name
    }

    #[must_use]
    pub fn check_number(&self) -> u64 {
        self.check.number
    }

    #[must_use]
    pub fn check_issue_date(&self) -> NaiveDate {
        self.check.issue_date
    }

    #[must_use]
    pub fn check_payment_date(&self) -> NaiveDate {
        self.check.payment_date
    }

    #[must_use]
    pub fn bank_account(&self) -> Option<&BankAccountRef> {
        self.bank_account.as_ref()
    }

    /// Account number, projected through the bank account reference.
    #[must_use]
    pub fn bank_account_number(&self) -> Option<&str> {
        self.bank_account.as_ref().map(|acc| acc.acc_number.as_str())
    }

    /// Bank name, projected through the bank account reference.
    #[must_use]
    pub fn bank_name(&self) -> Option<&str> {
        self.bank_account
            .as_ref()
            .and_then(|acc| acc.bank.as_ref())
            .map(|bank| bank.name.as_str())
    }

    #[must_use]
    pub fn payment(&self) -> Option<PaymentId> {
        self.payment
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Advance the concurrency version. Called by stores after a save.
    pub fn advance_version(&mut self) {
        self.version += 1;
    }

    // -- guarded field writes ------------------------------------------------

    /// # Errors
    /// Returns `Validation` if `amount` is negative. The record is unchanged.
    pub fn set_amount(&mut self, amount: Decimal) -> Result<()> {
        check_amount(amount)?;
        self.payment_fields.amount = amount;
        Ok(())
    }

    pub fn set_partner(&mut self, partner: Option<PartnerId>) {
        self.payment_fields.partner = partner;
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.payment_fields.currency = currency;
    }

    /// # Errors
    /// Returns `Validation` if the journal kind is not allowed by `config`.
    pub fn set_journal(&mut self, journal: JournalRef, config: &EngineConfig) -> Result<()> {
        check_journal(&journal, config)?;
        self.payment_fields.journal = journal;
        Ok(())
    }

    pub fn set_bank_account(&mut self, bank_account: Option<BankAccountRef>) {
        self.bank_account = bank_account;
    }

    pub fn set_payment(&mut self, payment: Option<PaymentId>) {
        self.payment = payment;
    }

    /// # Errors
    /// Returns `Validation` outside draft or when `name` is blank.
    pub fn set_check_name(&mut self, name: String) -> Result<()> {
        self.ensure_identifying_editable(CheckField::CheckName)?;
        check_name_value(&name)?;
        self.check.name = name;
        Ok(())
    }

    /// # Errors
    /// Returns `Validation` outside draft or when `number` is zero.
    pub fn set_check_number(&mut self, number: u64) -> Result<()> {
        self.ensure_identifying_editable(CheckField::CheckNumber)?;
        check_number_value(number)?;
        self.check.number = number;
        Ok(())
    }

    /// # Errors
    /// Returns `Validation` outside draft.
    pub fn set_check_issue_date(&mut self, date: NaiveDate) -> Result<()> {
        self.ensure_identifying_editable(CheckField::CheckIssueDate)?;
        self.check.issue_date = date;
        Ok(())
    }

    /// # Errors
    /// Returns `Validation` outside draft.
    pub fn set_check_payment_date(&mut self, date: NaiveDate) -> Result<()> {
        self.ensure_identifying_editable(CheckField::CheckPaymentDate)?;
        self.check.payment_date = date;
        Ok(())
    }

    fn ensure_identifying_editable(&self, field: CheckField) -> Result<()> {
        if !self.state.identifying_fields_editable() {
            return Err(CheckPaymentError::validation(
                field,
                format!("read-only once the check leaves DRAFT (state is {})", self.state),
            ));
        }
        Ok(())
    }

    /// Apply every field of `update`, or none of them.
    ///
    /// # Errors
    /// Returns the first `Validation` error hit; the record is unchanged.
    pub fn apply_update(
        &mut self,
        update: &CheckPaymentUpdate,
        config: &EngineConfig,
    ) -> Result<()> {
        let mut next = self.clone();
        if let Some(partner) = update.partner {
            next.set_partner(partner);
        }
        if let Some(amount) = update.amount {
            next.set_amount(amount)?;
        }
        if let Some(currency) = &update.currency {
            next.set_currency(currency.clone());
        }
        if let Some(journal) = &update.journal {
            next.set_journal(journal.clone(), config)?;
        }
        if let Some(name) = &update.check_name {
            next.set_check_name(name.clone())?;
        }
        if let Some(number) = update.check_number {
            next.set_check_number(number)?;
        }
        if let Some(date) = update.check_issue_date {
            next.set_check_issue_date(date)?;
        }
        if let Some(date) = update.check_payment_date {
            next.set_check_payment_date(date)?;
        }
        if let Some(bank_account) = &update.bank_account {
            next.set_bank_account(bank_account.clone());
        }
        if let Some(payment) = update.payment {
            next.set_payment(payment);
        }
        *self = next;
        Ok(())
    }

    // -- lifecycle ----------------------------------------------------------

    /// Move the record along `transition` and describe what happened.
    ///
    /// Posting stamps `posted_date` with the context's effective date.
    ///
    /// # Errors
    /// Returns `IllegalTransition` if the current state is not a legal
    /// predecessor. The record is unchanged.
    pub fn apply_transition(
        &mut self,
        transition: Transition,
        ctx: &TransitionContext,
    ) -> Result<TransitionRecord> {
        let from = self.state;
        if !transition.is_allowed_from(from) {
            return Err(CheckPaymentError::IllegalTransition { transition, from });
        }

        let to = transition.target();
        if to == CheckState::Posted {
            self.payment_fields.posted_date = Some(ctx.effective_date());
        }
        self.state = to;

        Ok(TransitionRecord::new(self.id, transition, from, to, ctx))
    }

    /// Listing order: payment date descending, then check name descending.
    #[must_use]
    pub fn listing_order(a: &Self, b: &Self) -> Ordering {
        b.check
            .payment_date
            .cmp(&a.check.payment_date)
            .then_with(|| b.check.name.cmp(&a.check.name))
    }
}

impl fmt::Display for CheckPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} {} {} [{}]",
            self.check.name,
            self.check.number,
            self.payment_fields.amount,
            self.payment_fields.currency,
            self.state
        )
    }
}

/// Fixtures for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl CheckPayment {
    /// A valid record on a bank journal, forced into `state`.
    pub fn dummy(amount: Decimal, state: CheckState) -> Self {
        let ctx = TransitionContext::system();
        let new = NewCheckPayment {
            partner: Some(PartnerId::new()),
            amount,
            currency: Some(Currency::new("USD")),
            journal: JournalRef::new(JournalKind::Bank, CompanyId::new()),
            check_name: "Test Check".to_string(),
            check_number: 1001,
            check_issue_date: None,
            check_payment_date: ctx.effective_date(),
            bank_account: None,
            payment: None,
        };
        let mut check = Self::create(new, Currency::new("USD"), &EngineConfig::default(), &ctx)
            .expect("dummy check must be valid");
        check.state = state;
        if state == CheckState::Posted {
            check.payment_fields.posted_date = Some(ctx.effective_date());
        }
        check
    }

    /// Force the state, bypassing the transition table.
    pub fn force_state(&mut self, state: CheckState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActorId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx_on(day: NaiveDate) -> TransitionContext {
        TransitionContext::new(ActorId::new(), day.and_hms_opt(9, 30, 0).unwrap().and_utc())
    }

    fn new_check(amount: Decimal) -> NewCheckPayment {
        NewCheckPayment {
            partner: None,
            amount,
            currency: None,
            journal: JournalRef::new(JournalKind::Bank, CompanyId::new()),
            check_name: "ACME Check".into(),
            check_number: 42,
            check_issue_date: None,
            check_payment_date: date(2026, 11, 1),
            bank_account: None,
            payment: None,
        }
    }

    #[test]
    fn create_defaults() {
        let ctx = ctx_on(date(2026, 10, 19));
        let check = CheckPayment::create(
            new_check(Decimal::new(100, 0)),
            Currency::new("EUR"),
            &EngineConfig::default(),
            &ctx,
        )
        .unwrap();
        assert_eq!(check.state(), CheckState::Draft);
        assert_eq!(check.name(), "Draft Check Payment");
        assert_eq!(check.currency().code(), "EUR");
        assert_eq!(check.check_issue_date(), date(2026, 10, 19));
        assert_eq!(check.posted_date(), None);
        assert_eq!(check.version(), 0);
    }

    #[test]
    fn explicit_currency_wins_over_default() {
        let mut new = new_check(Decimal::ONE);
        new.currency = Some(Currency::new("PHP"));
        let check = CheckPayment::create(
            new,
            Currency::new("EUR"),
            &EngineConfig::default(),
            &TransitionContext::system(),
        )
        .unwrap();
        assert_eq!(check.currency().code(), "PHP");
    }

    #[test]
    fn create_rejects_negative_amount() {
        let err = CheckPayment::create(
            new_check(Decimal::new(-5, 0)),
            Currency::new("USD"),
            &EngineConfig::default(),
            &TransitionContext::system(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some(CheckField::Amount));
    }

    #[test]
    fn create_accepts_zero_amount() {
        let check = CheckPayment::create(
            new_check(Decimal::ZERO),
            Currency::new("USD"),
            &EngineConfig::default(),
            &TransitionContext::system(),
        );
        assert!(check.is_ok());
    }

    #[test]
    fn create_rejects_sale_journal() {
        let mut new = new_check(Decimal::ONE);
        new.journal = JournalRef::new(JournalKind::Sale, CompanyId::new());
        let err = CheckPayment::create(
            new,
            Currency::new("USD"),
            &EngineConfig::default(),
            &TransitionContext::system(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some(CheckField::Journal));
    }

    #[test]
    fn create_requires_name_and_number() {
        let mut new = new_check(Decimal::ONE);
        new.check_name = "   ".into();
        let err = CheckPayment::create(
            new,
            Currency::new("USD"),
            &EngineConfig::default(),
            &TransitionContext::system(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some(CheckField::CheckName));

        let mut new = new_check(Decimal::ONE);
        new.check_number = 0;
        let err = CheckPayment::create(
            new,
            Currency::new("USD"),
            &EngineConfig::default(),
            &TransitionContext::system(),
        )
        .unwrap_err();
        assert_eq!(err.field(), Some(CheckField::CheckNumber));
    }

    #[test]
    fn negative_amount_rejected_in_every_state() {
        for state in CheckState::ALL {
            let mut check = CheckPayment::dummy(Decimal::new(100, 0), state);
            let err = check.set_amount(Decimal::new(-1, 2)).unwrap_err();
            assert_eq!(err.field(), Some(CheckField::Amount), "state {state}");
            assert_eq!(check.amount(), Decimal::new(100, 0));
        }
    }

    #[test]
    fn random_amount_writes_keep_amount_non_negative() {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let state = CheckState::ALL[rng.gen_range(0..CheckState::ALL.len())];
            let mut check = CheckPayment::dummy(Decimal::new(100, 0), state);
            let before = check.amount();
            let candidate = Decimal::new(rng.gen_range(-10_000i64..10_000), 2);
            match check.set_amount(candidate) {
                Ok(()) => assert_eq!(check.amount(), candidate),
                Err(err) => {
                    assert!(candidate < Decimal::ZERO);
                    assert_eq!(err.field(), Some(CheckField::Amount));
                    assert_eq!(check.amount(), before);
                }
            }
            assert!(check.amount() >= Decimal::ZERO);
        }
    }

    #[test]
    fn identifying_fields_locked_outside_draft() {
        for state in CheckState::ALL {
            let mut check = CheckPayment::dummy(Decimal::ONE, state);
            let before = check.clone();
            let results = [
                check.set_check_name("Other".into()),
                check.set_check_number(7),
                check.set_check_issue_date(date(2025, 1, 1)),
                check.set_check_payment_date(date(2025, 1, 2)),
            ];
            if state == CheckState::Draft {
                assert!(results.iter().all(|r| r.is_ok()));
                assert_eq!(check.check_number(), 7);
            } else {
                for (result, field) in results.iter().zip(CheckField::IDENTIFYING) {
                    let err = result.as_ref().unwrap_err();
                    assert_eq!(err.field(), Some(field));
                }
                assert_eq!(check, before);
            }
        }
    }

    #[test]
    fn non_identifying_fields_writable_after_draft() {
        let mut check = CheckPayment::dummy(Decimal::ONE, CheckState::Deposited);
        check.set_amount(Decimal::TEN).unwrap();
        check.set_partner(None);
        assert_eq!(check.amount(), Decimal::TEN);
        assert_eq!(check.partner(), None);
    }

    #[test]
    fn update_is_all_or_nothing() {
        let mut check = CheckPayment::dummy(Decimal::ONE, CheckState::Received);
        let before = check.clone();
        let update = CheckPaymentUpdate {
            amount: Some(Decimal::new(500, 0)),
            check_number: Some(99),
            ..Default::default()
        };
        let err = check
            .apply_update(&update, &EngineConfig::default())
            .unwrap_err();
        assert_eq!(err.field(), Some(CheckField::CheckNumber));
        assert_eq!(check, before, "amount must not be half-applied");
        assert!(update.touches_identifying_fields());
    }

    #[test]
    fn update_applies_in_draft() {
        let mut check = CheckPayment::dummy(Decimal::ONE, CheckState::Draft);
        let payment = PaymentId::new();
        let update = CheckPaymentUpdate {
            amount: Some(Decimal::new(250, 0)),
            check_name: Some("Renamed".into()),
            payment: Some(Some(payment)),
            ..Default::default()
        };
        check.apply_update(&update, &EngineConfig::default()).unwrap();
        assert_eq!(check.amount(), Decimal::new(250, 0));
        assert_eq!(check.check_name(), "Renamed");
        assert_eq!(check.payment(), Some(payment));
    }

    #[test]
    fn post_stamps_posted_date() {
        let mut check = CheckPayment::dummy(Decimal::ONE, CheckState::Issued);
        let ctx = ctx_on(date(2026, 12, 24));
        let record = check.apply_transition(Transition::Post, &ctx).unwrap();
        assert_eq!(check.state(), CheckState::Posted);
        assert_eq!(check.posted_date(), Some(date(2026, 12, 24)));
        assert_eq!(record.from, CheckState::Issued);
        assert_eq!(record.to, CheckState::Posted);
    }

    #[test]
    fn illegal_transition_leaves_record_untouched() {
        let mut check = CheckPayment::dummy(Decimal::ONE, CheckState::Draft);
        let before = check.clone();
        let err = check
            .apply_transition(Transition::Post, &TransitionContext::system())
            .unwrap_err();
        assert_eq!(
            err,
            CheckPaymentError::IllegalTransition {
                transition: Transition::Post,
                from: CheckState::Draft
            }
        );
        assert_eq!(check, before);
    }

    #[test]
    fn bank_projections() {
        let mut check = CheckPayment::dummy(Decimal::ONE, CheckState::Draft);
        assert_eq!(check.bank_account_number(), None);
        check.set_bank_account(Some(BankAccountRef {
            id: BankAccountId::new(),
            acc_number: "001-234".into(),
            bank: Some(BankRef {
                id: BankId::new(),
                name: "First Bank".into(),
            }),
        }));
        assert_eq!(check.bank_account_number(), Some("001-234"));
        assert_eq!(check.bank_name(), Some("First Bank"));
    }

    #[test]
    fn duplicate_resets_lifecycle_fields() {
        let mut original = CheckPayment::dummy(Decimal::new(75, 0), CheckState::Draft);
        original.set_payment(Some(PaymentId::new()));
        original.force_state(CheckState::Posted);
        let copy = original
            .duplicate(
                "Copy".into(),
                2002,
                &EngineConfig::default(),
                &TransitionContext::system(),
            )
            .unwrap();
        assert_ne!(copy.id(), original.id());
        assert_eq!(copy.state(), CheckState::Draft);
        assert_eq!(copy.posted_date(), None);
        assert_eq!(copy.amount(), original.amount());
        assert_eq!(copy.journal(), original.journal());
        assert_eq!(copy.payment(), original.payment());
        assert_eq!(copy.check_payment_date(), original.check_payment_date());
        assert_eq!(copy.check_number(), 2002);
    }

    #[test]
    fn listing_order_payment_date_then_name_desc() {
        let mut a = CheckPayment::dummy(Decimal::ONE, CheckState::Draft);
        let mut b = a.clone();
        let mut c = a.clone();
        a.set_check_payment_date(date(2026, 1, 1)).unwrap();
        b.set_check_payment_date(date(2026, 3, 1)).unwrap();
        c.set_check_payment_date(date(2026, 3, 1)).unwrap();
        b.set_check_name("Alpha".into()).unwrap();
        c.set_check_name("Bravo".into()).unwrap();
        let mut all = [a, b, c];
        all.sort_by(CheckPayment::listing_order);
        assert_eq!(all[0].check_name(), "Bravo");
        assert_eq!(all[1].check_name(), "Alpha");
        assert_eq!(all[2].check_payment_date(), date(2026, 1, 1));
    }

    #[test]
    fn stored_record_loads_back() {
        let check = CheckPayment::dummy(Decimal::new(1_250, 2), CheckState::Issued);
        let json = serde_json::to_value(&check).unwrap();
        let back: CheckPayment = serde_json::from_value(json).unwrap();
        assert_eq!(back, check);
    }

    #[test]
    fn stored_record_with_negative_amount_rejected() {
        let check = CheckPayment::dummy(Decimal::ONE, CheckState::Draft);
        let mut json = serde_json::to_value(&check).unwrap();
        json["payment_fields"]["amount"] = serde_json::json!("-5");

        let err = serde_json::from_value::<CheckPayment>(json).unwrap_err();
        assert!(err.to_string().contains("CP_ERR_100"), "{err}");
    }

    #[test]
    fn stored_record_with_blank_check_identity_rejected() {
        let check = CheckPayment::dummy(Decimal::ONE, CheckState::Draft);

        let mut json = serde_json::to_value(&check).unwrap();
        json["check"]["name"] = serde_json::json!("  ");
        let err = serde_json::from_value::<CheckPayment>(json).unwrap_err();
        assert!(err.to_string().contains("check_name"), "{err}");

        let mut json = serde_json::to_value(&check).unwrap();
        json["check"]["number"] = serde_json::json!(0);
        let err = serde_json::from_value::<CheckPayment>(json).unwrap_err();
        assert!(err.to_string().contains("check_number"), "{err}");
    }
}
