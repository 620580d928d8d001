//! # Check lifecycle state machine
//!
//! ```text
//!   from \ op   receive   deposit    issue   return    post     cancel
//!   DRAFT        RECEIVED            ISSUED                     CANCELLED
//!   RECEIVED               DEPOSITED         RETURNED           CANCELLED
//!   DEPOSITED                                RETURNED  POSTED
//!   ISSUED                                   RETURNED  POSTED   CANCELLED
//!   RETURNED                                                    CANCELLED
//!   POSTED       (terminal)
//!   CANCELLED    (terminal)
//! ```
//!
//! The table in [`CheckState::successors`] is the single source of truth.
//! Every operation is identified by its target state ([`Transition::target`]),
//! and an operation is legal exactly when its target is listed as a successor
//! of the current state. `POSTED` and `CANCELLED` are terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The lifecycle state of a check payment record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    /// Freshly recorded. The only state in which identifying fields may change.
    #[default]
    Draft,
    /// A check handed to us by a counterparty.
    Received,
    /// A received check that has been deposited at the bank.
    Deposited,
    /// A check we wrote and handed to a counterparty.
    Issued,
    /// The check bounced or was handed back.
    Returned,
    /// Cleared and applied to the ledger. Terminal.
    Posted,
    /// Voided. Terminal.
    Cancelled,
}

impl CheckState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Draft,
        Self::Received,
        Self::Deposited,
        Self::Issued,
        Self::Returned,
        Self::Posted,
        Self::Cancelled,
    ];

    /// States reachable from `self` in a single transition.
    #[must_use]
    pub fn successors(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Received, Self::Issued, Self::Cancelled],
            Self::Received => &[Self::Deposited, Self::Returned, Self::Cancelled],
            Self::Deposited => &[Self::Returned, Self::Posted],
            Self::Issued => &[Self::Returned, Self::Posted, Self::Cancelled],
            Self::Returned => &[Self::Cancelled],
            Self::Posted | Self::Cancelled => &[],
        }
    }

    /// Can a record in this state move directly to `target`?
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.successors().contains(&target)
    }

    /// Terminal states have no outgoing transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    /// Identifying check fields are writable only while in draft.
    #[must_use]
    pub fn identifying_fields_editable(self) -> bool {
        self == Self::Draft
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Received => "RECEIVED",
            Self::Deposited => "DEPOSITED",
            Self::Issued => "ISSUED",
            Self::Returned => "RETURNED",
            Self::Posted => "POSTED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// A named lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Receive,
    Deposit,
    Issue,
    Return,
    Post,
    Cancel,
}

impl Transition {
    pub const ALL: [Self; 6] = [
        Self::Receive,
        Self::Deposit,
        Self::Issue,
        Self::Return,
        Self::Post,
        Self::Cancel,
    ];

    /// The state a successful transition lands in.
    #[must_use]
    pub fn target(self) -> CheckState {
        match self {
            Self::Receive => CheckState::Received,
            Self::Deposit => CheckState::Deposited,
            Self::Issue => CheckState::Issued,
            Self::Return => CheckState::Returned,
            Self::Post => CheckState::Posted,
            Self::Cancel => CheckState::Cancelled,
        }
    }

    /// Legal predecessor states, derived from the successor table.
    #[must_use]
    pub fn sources(self) -> Vec<CheckState> {
        let target = self.target();
        CheckState::ALL
            .into_iter()
            .filter(|s| s.can_transition_to(target))
            .collect()
    }

    /// Is this operation legal from `from`?
    #[must_use]
    pub fn is_allowed_from(self, from: CheckState) -> bool {
        from.can_transition_to(self.target())
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Receive => "receive",
            Self::Deposit => "deposit",
            Self::Issue => "issue",
            Self::Return => "return",
            Self::Post => "post",
            Self::Cancel => "cancel",
        };
        f.write_str(s)
    }
}
