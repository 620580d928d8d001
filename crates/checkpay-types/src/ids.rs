//! Identifiers used throughout checkpay.
//!
//! Every identifier is a UUIDv7 newtype, so ids sort by creation time.
//! The engine only ever *owns* [`CheckPaymentId`]; the remaining ids point at
//! records held by collaborators (partners, journals, banks, payments).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// CheckPaymentId
// ---------------------------------------------------------------------------

/// Identity of a check payment record. Assigned at creation, never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CheckPaymentId(pub Uuid);

impl CheckPaymentId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CheckPaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CheckPaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chk:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// ActorId
// ---------------------------------------------------------------------------

/// The user (or system process) that requested a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Actor used for transitions driven by the system itself.
    #[must_use]
    pub fn system() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_system(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_system() {
            write!(f, "actor:system")
        } else {
            write!(f, "actor:{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborator reference ids
// ---------------------------------------------------------------------------

macro_rules! reference_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

reference_id!(
    /// Counterparty of the check.
    PartnerId,
    "partner"
);
reference_id!(
    /// Bank or cash ledger journal the check posts against.
    JournalId,
    "journal"
);
reference_id!(
    /// Company owning a journal.
    CompanyId,
    "company"
);
reference_id!(
    /// Payer/payee bank account.
    BankAccountId,
    "bank_account"
);
reference_id!(
    /// Bank holding a bank account.
    BankId,
    "bank"
);
reference_id!(
    /// Payment record that owns a check payment record.
    PaymentId,
    "payment"
);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
