//! # checkpay-lifecycle
//!
//! The **Check Lifecycle Engine**: guarded state transitions for check
//! payment records, with one audit record per successful transition.
//!
//! ## Architecture
//!
//! The engine owns no data. It works against three collaborators:
//! 1. [`CheckStore`]: loads and saves records, rejecting stale saves
//! 2. [`CurrencyProvider`]: default currency for new records
//! 3. [`AuditLog`]: receives a [`TransitionRecord`](checkpay_types::TransitionRecord)
//!    after every transition
//!
//! ## Transition Flow
//!
//! ```text
//! caller → engine.receive(id) → store.load → table check → store.save → audit.append
//! ```
//!
//! A rejected transition returns a typed error and changes nothing. A failed
//! audit append is reported on the outcome; the state change stands.
//! [`CheckLifecycleEngine::apply_batch`] runs one transition over many
//! records, each independently.

pub mod batch;
pub mod collaborators;
pub mod engine;
pub mod memory;

pub use batch::{BatchItem, BatchReport};
pub use collaborators::{AuditLog, CheckStore, CurrencyProvider};
pub use engine::{CheckLifecycleEngine, TransitionOutcome};
pub use memory::{FixedCurrency, MemoryAuditLog, MemoryCheckStore};
