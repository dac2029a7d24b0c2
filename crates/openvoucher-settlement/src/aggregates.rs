//! Aggregate counters maintained in the same atomic step as the ledger.
//!
//! Counters are incremental, never recomputed. Reclaims do not count as
//! redemptions: they return value to the issuer, so only custody changes.

use std::collections::HashMap;

use openvoucher_types::{AccountId, TokenId};
use rust_decimal::Decimal;

/// Contract-wide, per-token, and per-(agent, token) aggregates.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    total_minted: u64,
    total_redeemed: u64,
    /// Total value redeemed per token since genesis.
    redeemed_value: HashMap<TokenId, Decimal>,
    /// Minted value per (agent, token) since that agent's last commission
    /// settlement. Cleared by `clear_unsettled`.
    unsettled_minted: HashMap<(AccountId, TokenId), Decimal>,
}

impl Aggregates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one mint: bumps the contract counter and the agent's
    /// unsettled accumulator.
    pub fn record_mint(&mut self, agent: &AccountId, token: &TokenId, value: Decimal) {
        self.total_minted += 1;
        *self
            .unsettled_minted
            .entry((*agent, token.clone()))
            .or_insert(Decimal::ZERO) += value;
    }

    /// Record one redemption.
    pub fn record_redeem(&mut self, token: &TokenId, value: Decimal) {
        self.total_redeemed += 1;
        *self
            .redeemed_value
            .entry(token.clone())
            .or_insert(Decimal::ZERO) += value;
    }

    #[must_use]
    pub fn total_minted(&self) -> u64 {
        self.total_minted
    }

    #[must_use]
    pub fn total_redeemed(&self) -> u64 {
        self.total_redeemed
    }

    /// Total redeemed value for a token.
    #[must_use]
    pub fn token_redeemed_value(&self, token: &TokenId) -> Decimal {
        self.redeemed_value
            .get(token)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The agent's unsettled minted value per token, sorted by token for
    /// deterministic settlement order.
    #[must_use]
    pub fn unsettled_for(&self, agent: &AccountId) -> Vec<(TokenId, Decimal)> {
        let mut owed: Vec<(TokenId, Decimal)> = self
            .unsettled_minted
            .iter()
            .filter(|((a, _), _)| a == agent)
            .map(|((_, token), value)| (token.clone(), *value))
            .collect();
        owed.sort_by(|(a, _), (b, _)| a.cmp(b));
        owed
    }

    /// Reset the agent's unsettled accumulator after a commission payout.
    pub fn clear_unsettled(&mut self, agent: &AccountId) {
        self.unsettled_minted.retain(|(a, _), _| a != agent);
    }
}
