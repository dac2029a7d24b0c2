//! The settlement engine: fee computation plus atomic three-party transfers
//! for every voucher lifecycle transition.
//!
//! # Transfer discipline
//!
//! Each `settle_*` method is **fallible and side-effect-free on error**: it
//! builds the transfer legs for the transition and runs them through
//! [`execute_plan`], which compensates partial execution. Each `record_*`
//! method is **infallible bookkeeping** — aggregate counters and custody
//! tracking — and must only be called after the matching `settle_*` call
//! succeeded. Callers interleave their own ledger mutation into the same
//! commit phase, so an error anywhere leaves zero state change and zero
//! value moved.
//!
//! # Per-transition plans
//!
//! ```text
//! mint     issuer ──value──▶ pool      issuer ──fee──▶ treasury
//! redeem   pool ──value−fee──▶ holder  pool ──fee──▶ treasury
//! reclaim  pool ──value──▶ issuer                     (no fee)
//! ```

use std::collections::BTreeMap;

use openvoucher_types::{AccountId, Result, TokenId};
use rust_decimal::Decimal;

use crate::aggregates::Aggregates;
use crate::custody::CustodyTracker;
use crate::fees::{FeeSchedule, basis_point_fee};
use crate::transfer::{TransferLeg, ValueTransfer, execute_plan};

/// Fee schedule, aggregate counters, and custody tracking behind every
/// voucher lifecycle transition.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    fees: FeeSchedule,
    aggregates: Aggregates,
    custody: CustodyTracker,
}

impl SettlementEngine {
    /// # Errors
    /// Returns [`VoucherError::FeeTooHigh`] if either rate exceeds the cap.
    ///
    /// [`VoucherError::FeeTooHigh`]: openvoucher_types::VoucherError::FeeTooHigh
    pub fn new(minting_fee_bps: u32, redemption_fee_bps: u32) -> Result<Self> {
        Ok(Self {
            fees: FeeSchedule::new(minting_fee_bps, redemption_fee_bps)?,
            aggregates: Aggregates::new(),
            custody: CustodyTracker::new(),
        })
    }

    /// The live fee schedule.
    #[must_use]
    pub fn fees(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Replace both fee rates; both caps are checked before either mutates.
    pub fn update_fees(&mut self, minting_fee_bps: u32, redemption_fee_bps: u32) -> Result<()> {
        self.fees.update(minting_fee_bps, redemption_fee_bps)
    }

    // ──────────────────── fallible transfer phase ────────────────────

    /// Run the mint transfers: issuer funds the pool with `value` and pays
    /// the minting fee to the treasury. Returns the fee charged.
    pub fn settle_mint(
        &self,
        bank: &mut dyn ValueTransfer,
        token: &TokenId,
        issuer: &AccountId,
        pool: &AccountId,
        treasury: &AccountId,
        value: Decimal,
    ) -> Result<Decimal> {
        let fee = self.fees.minting_fee(value);
        let legs = [
            TransferLeg::new(token.clone(), *issuer, *pool, value),
            TransferLeg::new(token.clone(), *issuer, *treasury, fee),
        ];
        execute_plan(bank, &legs)?;
        Ok(fee)
    }

    /// Run the mint transfers for a whole batch as one plan.
    ///
    /// Fees are floored **per entry** and then summed, so the batch charges
    /// exactly what the same mints would cost independently; the legs are
    /// aggregated per token so the bank sees at most two transfers per
    /// token. Returns the per-entry fees in input order.
    pub fn settle_mint_batch(
        &self,
        bank: &mut dyn ValueTransfer,
        issuer: &AccountId,
        pool: &AccountId,
        treasury: &AccountId,
        entries: &[(TokenId, Decimal)],
    ) -> Result<Vec<Decimal>> {
        let mut fees = Vec::with_capacity(entries.len());
        // BTreeMap keeps the leg order deterministic across runs.
        let mut value_totals: BTreeMap<TokenId, Decimal> = BTreeMap::new();
        let mut fee_totals: BTreeMap<TokenId, Decimal> = BTreeMap::new();

        for (token, value) in entries {
            let fee = self.fees.minting_fee(*value);
            *value_totals.entry(token.clone()).or_insert(Decimal::ZERO) += *value;
            *fee_totals.entry(token.clone()).or_insert(Decimal::ZERO) += fee;
            fees.push(fee);
        }

        let mut legs = Vec::with_capacity(value_totals.len() + fee_totals.len());
        for (token, total) in &value_totals {
            legs.push(TransferLeg::new(token.clone(), *issuer, *pool, *total));
        }
        for (token, total) in &fee_totals {
            legs.push(TransferLeg::new(token.clone(), *issuer, *treasury, *total));
        }
        execute_plan(bank, &legs)?;
        Ok(fees)
    }

    /// Run the redeem transfers: the pool pays the holder `value − fee` and
    /// the treasury the fee. Returns the fee withheld.
    pub fn settle_redeem(
        &self,
        bank: &mut dyn ValueTransfer,
        token: &TokenId,
        pool: &AccountId,
        recipient: &AccountId,
        treasury: &AccountId,
        value: Decimal,
    ) -> Result<Decimal> {
        let fee = self.fees.redemption_fee(value);
        let legs = [
            TransferLeg::new(token.clone(), *pool, *recipient, value - fee),
            TransferLeg::new(token.clone(), *pool, *treasury, fee),
        ];
        execute_plan(bank, &legs)?;
        Ok(fee)
    }

    /// Run the reclaim transfer: the pool returns the full value to the
    /// issuer. The only transition with no fee.
    pub fn settle_reclaim(
        &self,
        bank: &mut dyn ValueTransfer,
        token: &TokenId,
        pool: &AccountId,
        issuer: &AccountId,
        value: Decimal,
    ) -> Result<()> {
        let legs = [TransferLeg::new(token.clone(), *pool, *issuer, value)];
        execute_plan(bank, &legs)
    }

    /// Pay out the agent's accrued commission from the treasury and reset
    /// the unsettled accumulator.
    ///
    /// Commission is `⌊unsettled_minted_value × rate_bps / 10000⌋` per
    /// token, paid treasury → agent as one compensated plan. Returns the
    /// commission per token (zero entries included), sorted by token.
    pub fn settle_commission(
        &mut self,
        bank: &mut dyn ValueTransfer,
        treasury: &AccountId,
        agent: &AccountId,
        rate_bps: u32,
    ) -> Result<Vec<(TokenId, Decimal)>> {
        let owed = self.aggregates.unsettled_for(agent);
        let mut paid = Vec::with_capacity(owed.len());
        let mut legs = Vec::with_capacity(owed.len());
        for (token, value) in owed {
            let commission = basis_point_fee(value, rate_bps);
            legs.push(TransferLeg::new(token.clone(), *treasury, *agent, commission));
            paid.push((token, commission));
        }
        execute_plan(bank, &legs)?;
        self.aggregates.clear_unsettled(agent);
        Ok(paid)
    }

    // ──────────────────── infallible commit phase ────────────────────

    /// Book one mint: contract/agent aggregates plus custody intake.
    pub fn record_mint(&mut self, agent: &AccountId, token: &TokenId, value: Decimal) {
        self.aggregates.record_mint(agent, token, value);
        self.custody.record_mint(token, value);
    }

    /// Book one redemption: redeemed counters plus custody release.
    pub fn record_redeem(&mut self, token: &TokenId, value: Decimal) {
        self.aggregates.record_redeem(token, value);
        self.custody.record_release(token, value);
    }

    /// Book one reclaim. Only custody changes — a reclaim returns value to
    /// the issuer, it is not a redemption.
    pub fn record_reclaim(&mut self, token: &TokenId, value: Decimal) {
        self.custody.record_release(token, value);
    }

    // ──────────────────── projections ────────────────────

    #[must_use]
    pub fn total_minted(&self) -> u64 {
        self.aggregates.total_minted()
    }

    #[must_use]
    pub fn total_redeemed(&self) -> u64 {
        self.aggregates.total_redeemed()
    }

    /// Total value redeemed in `token` since genesis.
    #[must_use]
    pub fn token_redeemed_value(&self, token: &TokenId) -> Decimal {
        self.aggregates.token_redeemed_value(token)
    }

    /// The agent's unsettled minted value per token.
    #[must_use]
    pub fn unsettled_for(&self, agent: &AccountId) -> Vec<(TokenId, Decimal)> {
        self.aggregates.unsettled_for(agent)
    }

    /// Expected pool custody for a token (Σ outstanding voucher values).
    #[must_use]
    pub fn expected_custody(&self, token: &TokenId) -> Decimal {
        self.custody.expected_custody(token)
    }

    /// Check the conservation invariant against the live pool balance.
    ///
    /// # Errors
    /// Returns [`VoucherError::CustodyInvariantViolation`] when the bank's
    /// pool balance disagrees with expected custody.
    ///
    /// [`VoucherError::CustodyInvariantViolation`]: openvoucher_types::VoucherError::CustodyInvariantViolation
    pub fn verify_custody(
        &self,
        bank: &dyn ValueTransfer,
        pool: &AccountId,
        token: &TokenId,
    ) -> Result<()> {
        self.custody.verify(token, bank.balance_of(token, pool))
    }
}
