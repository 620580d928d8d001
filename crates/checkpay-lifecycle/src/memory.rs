//! In-process collaborator implementations.
//!
//! Used by tests and by hosts that keep check records in memory. Each store
//! guards its data with a `Mutex`; a poisoned lock surfaces as a `Storage`
//! error rather than a panic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use checkpay_types::{
    CheckPayment, CheckPaymentError, CheckPaymentId, CompanyId, Currency, PaymentId, Result,
    TransitionRecord,
};

use crate::collaborators::{AuditLog, CheckStore, CurrencyProvider};

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| CheckPaymentError::Storage(format!("{what} lock poisoned")))
}

// ---------------------------------------------------------------------------
// MemoryCheckStore
// ---------------------------------------------------------------------------

/// Check records in a `HashMap`, versioned for optimistic concurrency.
#[derive(Debug, Default)]
pub struct MemoryCheckStore {
    records: Mutex<HashMap<CheckPaymentId, CheckPayment>>,
}

impl MemoryCheckStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize> {
        Ok(lock(&self.records, "check store")?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl CheckStore for MemoryCheckStore {
    fn insert(&self, check: CheckPayment) -> Result<CheckPayment> {
        let mut records = lock(&self.records, "check store")?;
        if records.contains_key(&check.id()) {
            return Err(CheckPaymentError::DuplicateRecord(check.id()));
        }
        records.insert(check.id(), check.clone());
        Ok(check)
    }

    fn load(&self, id: CheckPaymentId) -> Result<CheckPayment> {
        lock(&self.records, "check store")?
            .get(&id)
            .cloned()
            .ok_or(CheckPaymentError::NotFound(id))
    }

    fn save(&self, mut check: CheckPayment) -> Result<CheckPayment> {
        let mut records = lock(&self.records, "check store")?;
        let stored = records
            .get_mut(&check.id())
            .ok_or(CheckPaymentError::NotFound(check.id()))?;
        if stored.version() != check.version() {
            return Err(CheckPaymentError::StaleRecord {
                id: check.id(),
                expected: check.version(),
                actual: stored.version(),
            });
        }
        check.advance_version();
        *stored = check.clone();
        Ok(check)
    }

    fn delete_for_payment(&self, payment: PaymentId) -> Result<Vec<CheckPaymentId>> {
        let mut records = lock(&self.records, "check store")?;
        let mut removed: Vec<CheckPaymentId> = records
            .values()
            .filter(|check| check.payment() == Some(payment))
            .map(CheckPayment::id)
            .collect();
        removed.sort();
        for id in &removed {
            records.remove(id);
        }
        Ok(removed)
    }

    fn list(&self) -> Result<Vec<CheckPayment>> {
        let mut all: Vec<CheckPayment> = lock(&self.records, "check store")?
            .values()
            .cloned()
            .collect();
        all.sort_by(CheckPayment::listing_order);
        Ok(all)
    }
}

// ---------------------------------------------------------------------------
// MemoryAuditLog
// ---------------------------------------------------------------------------

/// Append-only vector of transition records.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    records: Mutex<Vec<TransitionRecord>>,
}

impl MemoryAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record, oldest first.
    pub fn records(&self) -> Result<Vec<TransitionRecord>> {
        Ok(lock(&self.records, "audit log")?.clone())
    }

    /// Records for one check, oldest first.
    pub fn history(&self, check: CheckPaymentId) -> Result<Vec<TransitionRecord>> {
        Ok(lock(&self.records, "audit log")?
            .iter()
            .filter(|rec| rec.check == check)
            .cloned()
            .collect())
    }

    /// `true` if every stored record still matches its digest.
    pub fn verify(&self) -> Result<bool> {
        Ok(lock(&self.records, "audit log")?
            .iter()
            .all(TransitionRecord::verify))
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&self, record: &TransitionRecord) -> Result<()> {
        self.records
            .lock()
            .map_err(|_| CheckPaymentError::AuditUnavailable("audit log lock poisoned".into()))?
            .push(record.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FixedCurrency
// ---------------------------------------------------------------------------

/// Per-company currency table with a fallback.
#[derive(Debug, Clone)]
pub struct FixedCurrency {
    fallback: Currency,
    by_company: HashMap<CompanyId, Currency>,
}

impl FixedCurrency {
    #[must_use]
    pub fn new(fallback: Currency) -> Self {
        Self {
            fallback,
            by_company: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: CompanyId, currency: Currency) -> Self {
        self.by_company.insert(company, currency);
        self
    }
}

impl CurrencyProvider for FixedCurrency {
    fn default_currency(&self, company: CompanyId) -> Currency {
        self.by_company
            .get(&company)
            .unwrap_or(&self.fallback)
            .clone()
    }
}
