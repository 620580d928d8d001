//! # checkpay-types
//!
//! Shared types, errors, and configuration for the **checkpay** lifecycle
//! engine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`CheckPaymentId`], [`ActorId`], and the reference ids
//!   ([`PartnerId`], [`JournalId`], [`CompanyId`], [`BankAccountId`], [`BankId`], [`PaymentId`])
//! - **State machine**: [`CheckState`], [`Transition`]
//! - **Check model**: [`CheckPayment`], [`NewCheckPayment`], [`CheckPaymentUpdate`],
//!   [`JournalRef`], [`BankAccountRef`], [`Currency`]
//! - **Audit model**: [`TransitionRecord`], [`TransitionContext`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`CheckPaymentError`] with `CP_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod audit;
pub mod check;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod state;

// Re-export all primary types at crate root for ergonomic imports:
//   use checkpay_types::{CheckPayment, CheckState, Transition, ...};

pub use audit::*;
pub use check::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use state::*;

// Constants are accessed via `checkpay_types::constants::FOO`
// (not re-exported to avoid name collisions).
