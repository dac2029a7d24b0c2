//! # openvoucher-ledger
//!
//! **Ledger plane** of the OpenVoucher pool: registries, the voucher
//! lifecycle state machine, and the [`VoucherPool`] facade exposing the
//! full operation catalogue.
//!
//! ## Lifecycle
//!
//! ```text
//!   ┌─────────────┐   mint    ┌────────┐  redeem / reclaim  ┌──────────┐
//!   │ NONEXISTENT ├──────────▶│ ACTIVE ├───────────────────▶│ REDEEMED │
//!   └─────────────┘           └────────┘                    └──────────┘
//! ```
//!
//! ## Components
//!
//! - [`TokenRegistry`] / [`AgentRegistry`]: supported value-unit types and
//!   registered agents with commission rates
//! - [`VoucherLedger`]: fingerprint → record map; owns the state machine
//! - [`VoucherPool`]: the single-consistency-domain facade — every public
//!   call fully commits or fully aborts
//! - [`ReentrancyLock`]: rejects mutating calls re-entering mid-operation
//! - [`Clock`] / [`AccessControl`]: injected collaborators, with
//!   [`SystemClock`], [`ManualClock`], and [`AdminSet`] implementations
//!
//! ## Atomicity discipline
//!
//! Each operation orders its work as preconditions → fallible transfers
//! (compensated internally by the settlement engine) → infallible commit.
//! An error anywhere leaves zero state mutation and zero value movement.

pub mod access;
pub mod clock;
pub mod guard;
pub mod ledger;
pub mod pool;
pub mod registry;

pub use access::{AccessControl, AdminSet};
pub use clock::{Clock, ManualClock, SystemClock};
pub use guard::ReentrancyLock;
pub use ledger::VoucherLedger;
pub use pool::VoucherPool;
pub use registry::{AgentRegistry, TokenRegistry};
