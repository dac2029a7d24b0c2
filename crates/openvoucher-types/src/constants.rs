//! System-wide constants for the OpenVoucher pool.

/// Basis-point denominator: 10000 bps = 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Maximum minting/redemption fee: 500 bps = 5%.
pub const MAX_FEE_BPS: u32 = 500;

/// Maximum agent commission rate: 1000 bps = 10%.
pub const MAX_COMMISSION_RATE_BPS: u32 = 1_000;

/// Minimum voucher expiry window in days (when an expiry is given).
pub const MIN_EXPIRY_DAYS: u32 = 1;

/// Maximum voucher expiry window in days.
pub const MAX_EXPIRY_DAYS: u32 = 365;

/// Maximum entries in a single mint batch.
pub const MAX_BATCH_SIZE: usize = 100;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenVoucher";
