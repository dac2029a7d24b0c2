//! Configuration for the voucher pool.

use serde::{Deserialize, Serialize};

use crate::{AccountId, constants};

/// Construction-time configuration of a voucher pool.
///
/// Fee caps are enforced here as well as on later updates, so a pool can
/// never come up with an out-of-range rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// The pool's own custody account — holds all outstanding voucher value.
    pub pool_account: AccountId,
    /// Fee-revenue account, also the source of agent commissions.
    pub treasury: AccountId,
    /// Fee charged on mint, in basis points (≤ 500).
    pub minting_fee_bps: u32,
    /// Fee charged on redeem, in basis points (≤ 500).
    pub redemption_fee_bps: u32,
    /// Expiry window applied when a mint passes `expiry_days = 0`.
    /// `0` here means such vouchers never expire.
    pub default_expiry_days: u32,
}

impl PoolConfig {
    /// Validated constructor.
    ///
    /// # Errors
    /// - [`VoucherError::FeeTooHigh`] if either fee exceeds 500 bps
    /// - [`VoucherError::InvalidExpiry`] if the default expiry is nonzero
    ///   and outside 1..=365 days
    ///
    /// [`VoucherError::FeeTooHigh`]: crate::VoucherError::FeeTooHigh
    /// [`VoucherError::InvalidExpiry`]: crate::VoucherError::InvalidExpiry
    pub fn new(
        pool_account: AccountId,
        treasury: AccountId,
        minting_fee_bps: u32,
        redemption_fee_bps: u32,
        default_expiry_days: u32,
    ) -> crate::Result<Self> {
        for rate_bps in [minting_fee_bps, redemption_fee_bps] {
            if rate_bps > constants::MAX_FEE_BPS {
                return Err(crate::VoucherError::FeeTooHigh { rate_bps });
            }
        }
        if default_expiry_days > constants::MAX_EXPIRY_DAYS {
            return Err(crate::VoucherError::InvalidExpiry {
                days: default_expiry_days,
            });
        }
        Ok(Self {
            pool_account,
            treasury,
            minting_fee_bps,
            redemption_fee_bps,
            default_expiry_days,
        })
    }
}
