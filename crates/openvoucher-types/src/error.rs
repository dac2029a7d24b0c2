//! Error types for the OpenVoucher pool.
//!
//! All errors use the `OV_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Authorization errors
//! - 2xx: Validation errors
//! - 3xx: Voucher state errors
//! - 4xx: Settlement / transfer errors
//! - 9xx: General / internal errors
//!
//! Propagation policy: every error aborts the entire current operation with
//! zero state mutation and zero value movement. There is no partial success.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, CodeFingerprint, TokenId};

/// Central error enum for all OpenVoucher operations.
#[derive(Debug, Error)]
pub enum VoucherError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// The caller is not a registered, active agent — or, on reclaim,
    /// not the issuer of the voucher in question.
    #[error("OV_ERR_100: Unauthorized minter: {0}")]
    UnauthorizedMinter(AccountId),

    /// The caller lacks the administrative capability.
    #[error("OV_ERR_101: Not an administrator: {0}")]
    NotAdministrator(AccountId),

    // =================================================================
    // Validation Errors (2xx)
    // =================================================================
    /// The batch arrays are length-mismatched, empty, or oversized.
    #[error("OV_ERR_200: Invalid batch size: {reason}")]
    InvalidBatchSize { reason: String },

    /// The expiry window is outside 1..=365 days (when nonzero).
    #[error("OV_ERR_201: Invalid expiry: {days} days")]
    InvalidExpiry { days: u32 },

    /// The voucher value must be strictly positive.
    #[error("OV_ERR_202: Invalid voucher value: {value}")]
    InvalidValue { value: Decimal },

    /// The agent commission rate exceeds the 1000 bps cap.
    #[error("OV_ERR_203: Invalid commission rate: {rate_bps} bps")]
    InvalidCommissionRate { rate_bps: u32 },

    /// A minting/redemption fee rate exceeds the 500 bps cap.
    #[error("OV_ERR_204: Fee too high: {rate_bps} bps")]
    FeeTooHigh { rate_bps: u32 },

    /// The value-unit type is not in the supported-token registry.
    #[error("OV_ERR_205: Token not supported: {0}")]
    TokenNotSupported(TokenId),

    // =================================================================
    // Voucher State Errors (3xx)
    // =================================================================
    /// A voucher with this fingerprint already exists.
    #[error("OV_ERR_300: Duplicate voucher code: {0}")]
    DuplicateVoucherCode(CodeFingerprint),

    /// The voucher has already reached its terminal state
    /// (via redeem or reclaim — both set the same flag).
    #[error("OV_ERR_301: Voucher already redeemed: {0}")]
    VoucherAlreadyRedeemed(CodeFingerprint),

    /// No voucher exists for this fingerprint.
    #[error("OV_ERR_302: Voucher not found: {0}")]
    VoucherNotFound(CodeFingerprint),

    /// The voucher is past its expiry and can no longer be redeemed.
    #[error("OV_ERR_303: Voucher expired: {0}")]
    VoucherExpired(CodeFingerprint),

    /// The voucher has not expired (or never expires) and cannot be reclaimed.
    #[error("OV_ERR_304: Voucher not expired: {0}")]
    VoucherNotExpired(CodeFingerprint),

    // =================================================================
    // Settlement / Transfer Errors (4xx)
    // =================================================================
    /// The value-transfer collaborator rejected a transfer leg.
    #[error("OV_ERR_400: Transfer failed for {token}: {reason}")]
    TransferFailed { token: TokenId, reason: String },

    /// Pool custody no longer matches the sum of outstanding voucher
    /// values — critical safety alert.
    #[error("OV_ERR_401: Custody invariant violation: {reason}")]
    CustodyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// A mutating operation re-entered the pool before the previous
    /// operation completed.
    #[error("OV_ERR_900: Reentrant call rejected")]
    ReentrantCall,

    /// Unrecoverable internal error.
    #[error("OV_ERR_901: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("OV_ERR_902: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, VoucherError>;

// Conversion from serde_json::Error
impl From<serde_json::Error> for VoucherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
