//! Custody conservation invariant checker.
//!
//! Mathematical invariant enforced after every settlement:
//! ```text
//! ∀ token: pool_balance(token) == Σ value over vouchers
//!          where exists && !redeemed && token matches
//! ```
//!
//! If this invariant ever breaks, the pool is leaking or minting value —
//! something has gone catastrophically wrong. This is the ultimate safety
//! net for the three-party transfer discipline.

use std::collections::HashMap;

use openvoucher_types::{Result, TokenId, VoucherError};
use rust_decimal::Decimal;

/// Tracks the expected pool custody per token and validates it against the
/// live bank balance.
#[derive(Debug, Clone, Default)]
pub struct CustodyTracker {
    /// Expected custody per token: +value on mint, −value on redeem/reclaim.
    expected: HashMap<TokenId, Decimal>,
}

impl CustodyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record value entering custody (mint).
    pub fn record_mint(&mut self, token: &TokenId, value: Decimal) {
        *self.expected.entry(token.clone()).or_insert(Decimal::ZERO) += value;
    }

    /// Record value leaving custody (redeem or reclaim).
    pub fn record_release(&mut self, token: &TokenId, value: Decimal) {
        *self.expected.entry(token.clone()).or_insert(Decimal::ZERO) -= value;
    }

    /// Expected pool custody for a token.
    #[must_use]
    pub fn expected_custody(&self, token: &TokenId) -> Decimal {
        self.expected.get(token).copied().unwrap_or(Decimal::ZERO)
    }

    /// Verify that the actual pool balance matches expected custody.
    ///
    /// # Errors
    /// Returns [`VoucherError::CustodyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, token: &TokenId, actual_custody: Decimal) -> Result<()> {
        let expected = self.expected_custody(token);
        if actual_custody != expected {
            return Err(VoucherError::CustodyInvariantViolation {
                reason: format!(
                    "token {token}: actual custody {actual_custody} != expected {expected}"
                ),
            });
        }
        Ok(())
    }

    /// All tokens that ever held custody.
    #[must_use]
    pub fn tracked_tokens(&self) -> Vec<TokenId> {
        self.expected.keys().cloned().collect()
    }
}
