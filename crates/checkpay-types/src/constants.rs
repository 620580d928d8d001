//! System-wide constants for the checkpay lifecycle engine.

/// Display name given to every freshly created check payment record.
pub const DEFAULT_DRAFT_NAME: &str = "Draft Check Payment";

/// Maximum number of records a single batch call may touch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 1_000;

/// Version of the canonical encoding hashed into a transition record digest.
pub const TRANSITION_DIGEST_DOMAIN: &[u8] = b"checkpay:transition:v1:";
