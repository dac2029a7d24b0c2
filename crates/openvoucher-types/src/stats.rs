//! Read-only stats projections exposed by the pool.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contract-wide aggregate counters plus the live fee schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractStats {
    /// Vouchers minted since genesis (batch entries count individually).
    pub total_minted: u64,
    /// Vouchers redeemed since genesis. Reclaims are not counted here —
    /// they return value to the issuer, they are not redemptions.
    pub total_redeemed: u64,
    pub minting_fee_bps: u32,
    pub redemption_fee_bps: u32,
}

/// Per-agent stats projection.
///
/// Unknown identities project to the inactive zero-valued default, the
/// same policy as [`VoucherStatus`] for unknown fingerprints.
///
/// [`VoucherStatus`]: crate::VoucherStatus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    pub active: bool,
    pub commission_rate_bps: u32,
    pub total_minted: u64,
    pub total_value_minted: Decimal,
    /// `None` for identities that were never registered.
    pub last_settlement: Option<DateTime<Utc>>,
}

impl Default for AgentStats {
    fn default() -> Self {
        Self {
            active: false,
            commission_rate_bps: 0,
            total_minted: 0,
            total_value_minted: Decimal::ZERO,
            last_settlement: None,
        }
    }
}

impl From<&crate::Agent> for AgentStats {
    fn from(agent: &crate::Agent) -> Self {
        Self {
            active: agent.active,
            commission_rate_bps: agent.commission_rate_bps,
            total_minted: agent.total_minted,
            total_value_minted: agent.total_value_minted,
            last_settlement: Some(agent.last_settlement),
        }
    }
}
