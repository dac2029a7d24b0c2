//! Agent records: registered issuers with commission accounting.
//!
//! An agent may mint only while `active`. Deactivation never touches the
//! vouchers an agent already minted — those stay redeemable and reclaimable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_COMMISSION_RATE_BPS;

/// A registered voucher-issuing agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Whether the agent may currently mint.
    pub active: bool,
    /// Commission rate in basis points (≤ 1000 = 10%).
    pub commission_rate_bps: u32,
    /// Number of vouchers minted since registration.
    pub total_minted: u64,
    /// Total value minted across all tokens since registration.
    pub total_value_minted: Decimal,
    /// Last commission settlement (registration time until the first one).
    pub last_settlement: DateTime<Utc>,
}

impl Agent {
    /// Register a fresh agent with zeroed counters.
    ///
    /// # Errors
    /// Returns [`VoucherError::InvalidCommissionRate`] above 1000 bps.
    ///
    /// [`VoucherError::InvalidCommissionRate`]: crate::VoucherError::InvalidCommissionRate
    pub fn new(commission_rate_bps: u32, now: DateTime<Utc>) -> crate::Result<Self> {
        if commission_rate_bps > MAX_COMMISSION_RATE_BPS {
            return Err(crate::VoucherError::InvalidCommissionRate {
                rate_bps: commission_rate_bps,
            });
        }
        Ok(Self {
            active: true,
            commission_rate_bps,
            total_minted: 0,
            total_value_minted: Decimal::ZERO,
            last_settlement: now,
        })
    }

    /// Record one successful mint against this agent's counters.
    pub fn record_mint(&mut self, value: Decimal) {
        self.total_minted += 1;
        self.total_value_minted += value;
    }
}
