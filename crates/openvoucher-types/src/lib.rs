//! # openvoucher-types
//!
//! Shared types, errors, and configuration for the **OpenVoucher** voucher pool.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`CodeFingerprint`], [`AccountId`], [`TokenId`]
//! - **Voucher model**: [`Voucher`], [`VoucherState`], [`VoucherStatus`]
//! - **Agent model**: [`Agent`]
//! - **Batch model**: [`MintBatch`]
//! - **Stats projections**: [`ContractStats`], [`AgentStats`]
//! - **Configuration**: [`PoolConfig`]
//! - **Errors**: [`VoucherError`] with `OV_ERR_` prefix codes
//! - **Constants**: fee caps, expiry bounds, batch limits

pub mod agent;
pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod stats;
pub mod voucher;

// Re-export all primary types at crate root for ergonomic imports:
//   use openvoucher_types::{Voucher, VoucherState, Agent, PoolConfig, ...};

pub use agent::*;
pub use batch::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use stats::*;
pub use voucher::*;

// Constants are accessed via `openvoucher_types::constants::FOO`
// (not re-exported to avoid name collisions).
