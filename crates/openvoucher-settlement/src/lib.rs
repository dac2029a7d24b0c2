//! # openvoucher-settlement
//!
//! **Settlement plane**: fee computation, atomic multi-leg value transfers,
//! custody conservation, and aggregate accounting.
//!
//! ## Architecture
//!
//! The [`SettlementEngine`] sits between the voucher ledger and the external
//! value-transfer service. For every lifecycle transition it:
//! 1. Computes the fee from the live [`FeeSchedule`] (floor basis-point math)
//! 2. Builds the transfer legs for the transition (issuer/pool/treasury)
//! 3. Executes the plan through the [`ValueTransfer`] collaborator,
//!    compensating already-executed legs if a later leg fails
//! 4. Commits custody and aggregate bookkeeping — only after every leg
//!    succeeded, so an error leaves zero state change and zero value moved
//!
//! ## Atomicity discipline
//!
//! All fallible transfer legs run before any bookkeeping mutation. The plan
//! executor unwinds partial execution internally; the commit phase is
//! infallible. Callers layer their own ledger mutation after the engine
//! call, preserving the same ordering.

pub mod aggregates;
pub mod custody;
pub mod engine;
pub mod fees;
pub mod transfer;

pub use aggregates::Aggregates;
pub use custody::CustodyTracker;
pub use engine::SettlementEngine;
pub use fees::{FeeSchedule, basis_point_fee};
pub use transfer::{MemoryBank, TransferLeg, ValueTransfer, execute_plan};

#[cfg(any(test, feature = "test-helpers"))]
pub use transfer::FailingBank;
