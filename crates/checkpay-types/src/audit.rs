//! Transition records for the checkpay audit trail.
//!
//! Every successful transition produces exactly one [`TransitionRecord`].
//! Records are immutable: the `digest` commits to every other field, so an
//! altered record fails [`TransitionRecord::verify`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{ActorId, CheckPaymentId, CheckState, Transition, constants};

/// Who is asking for a transition, and when it takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionContext {
    pub actor: ActorId,
    pub at: DateTime<Utc>,
}

impl TransitionContext {
    #[must_use]
    pub fn new(actor: ActorId, at: DateTime<Utc>) -> Self {
        Self { actor, at }
    }

    /// Context for `actor` at the current wall-clock time.
    #[must_use]
    pub fn now(actor: ActorId) -> Self {
        Self::new(actor, Utc::now())
    }

    /// Context for system-driven operations at the current time.
    #[must_use]
    pub fn system() -> Self {
        Self::now(ActorId::system())
    }

    /// The calendar date stamped on the record (e.g. the posted date).
    #[must_use]
    pub fn effective_date(&self) -> NaiveDate {
        self.at.date_naive()
    }
}

/// Immutable audit entry: `{from, to, at, actor}` for one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub check: CheckPaymentId,
    pub transition: Transition,
    pub from: CheckState,
    pub to: CheckState,
    pub at: DateTime<Utc>,
    pub actor: ActorId,
    /// SHA-256 over the canonical encoding of the fields above.
    pub digest: [u8; 32],
}

impl TransitionRecord {
    #[must_use]
    pub fn new(
        check: CheckPaymentId,
        transition: Transition,
        from: CheckState,
        to: CheckState,
        ctx: &TransitionContext,
    ) -> Self {
        let digest = compute_digest(check, transition, from, to, ctx.at, ctx.actor);
        Self {
            check,
            transition,
            from,
            to,
            at: ctx.at,
            actor: ctx.actor,
            digest,
        }
    }

    /// Recompute the digest and compare.
    #[must_use]
    pub fn verify(&self) -> bool {
        compute_digest(
            self.check,
            self.transition,
            self.from,
            self.to,
            self.at,
            self.actor,
        ) == self.digest
    }

    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

impl std::fmt::Display for TransitionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}: {} -> {} by {} at {}",
            self.check,
            self.transition,
            self.from,
            self.to,
            self.actor,
            self.at.to_rfc3339()
        )
    }
}

fn compute_digest(
    check: CheckPaymentId,
    transition: Transition,
    from: CheckState,
    to: CheckState,
    at: DateTime<Utc>,
    actor: ActorId,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(constants::TRANSITION_DIGEST_DOMAIN);
    hasher.update(check.0.as_bytes());
    hasher.update(transition.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(from.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(to.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(at.timestamp_micros().to_le_bytes());
    hasher.update(actor.0.as_bytes());
    hasher.finalize().into()
}
