//! Value-transfer collaborator interface and the multi-leg plan executor.
//!
//! The pool never touches token balances directly — every movement goes
//! through the [`ValueTransfer`] trait. A lifecycle transition produces a
//! *plan* of up to a few legs; [`execute_plan`] runs them in order and, if
//! a later leg fails, reverses the legs that already executed so the bank
//! is left exactly as it was found.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use openvoucher_types::{AccountId, Result, TokenId, VoucherError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// External fungible-token transfer service.
///
/// Must be atomic per call: a returned error means no value moved for that
/// call. The `transfer(dest, amount)` form of the interface is the
/// pool-sourced special case `transfer_from(pool, dest, amount)` — the
/// engine always names its source account explicitly.
pub trait ValueTransfer {
    /// Move `amount` of `token` from `source` to `dest`.
    fn transfer_from(
        &mut self,
        token: &TokenId,
        source: &AccountId,
        dest: &AccountId,
        amount: Decimal,
    ) -> Result<()>;

    /// Current balance of `holder` in `token`.
    fn balance_of(&self, token: &TokenId, holder: &AccountId) -> Decimal;
}

/// One leg of a settlement plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLeg {
    pub token: TokenId,
    pub source: AccountId,
    pub dest: AccountId,
    pub amount: Decimal,
}

impl TransferLeg {
    #[must_use]
    pub fn new(token: TokenId, source: AccountId, dest: AccountId, amount: Decimal) -> Self {
        Self {
            token,
            source,
            dest,
            amount,
        }
    }

    /// The compensating leg: same amount, opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            token: self.token.clone(),
            source: self.dest,
            dest: self.source,
            amount: self.amount,
        }
    }
}

/// Execute a plan of transfer legs in order.
///
/// Zero-amount legs are skipped. If leg `i` fails, legs `0..i` are
/// reversed (newest first) and the original failure is surfaced — the bank
/// ends up exactly as before the call.
///
/// # Errors
/// - The failing leg's [`VoucherError::TransferFailed`] after a clean unwind
/// - [`VoucherError::CustodyInvariantViolation`] if a compensating transfer
///   itself fails, leaving the bank inconsistent
pub fn execute_plan(bank: &mut dyn ValueTransfer, legs: &[TransferLeg]) -> Result<()> {
    let mut executed: Vec<&TransferLeg> = Vec::with_capacity(legs.len());

    for leg in legs {
        if leg.amount.is_zero() {
            continue;
        }
        match bank.transfer_from(&leg.token, &leg.source, &leg.dest, leg.amount) {
            Ok(()) => {
                tracing::debug!(
                    token = %leg.token,
                    source = %leg.source,
                    dest = %leg.dest,
                    amount = %leg.amount,
                    "transfer leg executed"
                );
                executed.push(leg);
            }
            Err(err) => {
                tracing::warn!(
                    token = %leg.token,
                    amount = %leg.amount,
                    unwound = executed.len(),
                    error = %err,
                    "transfer leg failed, compensating executed legs"
                );
                for done in executed.iter().rev() {
                    let back = done.reversed();
                    bank.transfer_from(&back.token, &back.source, &back.dest, back.amount)
                        .map_err(|unwind_err| VoucherError::CustodyInvariantViolation {
                            reason: format!(
                                "compensation failed for {} {} -> {}: {unwind_err}",
                                back.token, back.source, back.dest
                            ),
                        })?;
                }
                return Err(err);
            }
        }
    }
    Ok(())
}

/// In-memory reference implementation of [`ValueTransfer`].
///
/// Cloned handles share the same underlying balances, so a test or
/// simulation can keep a handle for deposits while the pool owns the
/// boxed collaborator.
#[derive(Debug, Clone, Default)]
pub struct MemoryBank {
    balances: Arc<Mutex<HashMap<(TokenId, AccountId), Decimal>>>,
}

impl MemoryBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fund an account. Used to seed issuers and the treasury.
    pub fn deposit(&self, token: &TokenId, holder: &AccountId, amount: Decimal) {
        let mut balances = self.balances.lock().unwrap_or_else(PoisonError::into_inner);
        *balances
            .entry((token.clone(), *holder))
            .or_insert(Decimal::ZERO) += amount;
    }
}

impl ValueTransfer for MemoryBank {
    fn transfer_from(
        &mut self,
        token: &TokenId,
        source: &AccountId,
        dest: &AccountId,
        amount: Decimal,
    ) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(VoucherError::TransferFailed {
                token: token.clone(),
                reason: format!("negative amount {amount}"),
            });
        }
        let mut balances = self.balances.lock().unwrap_or_else(PoisonError::into_inner);
        let held = balances
            .get(&(token.clone(), *source))
            .copied()
            .unwrap_or(Decimal::ZERO);
        if held < amount {
            return Err(VoucherError::TransferFailed {
                token: token.clone(),
                reason: format!("insufficient balance: need {amount}, have {held}"),
            });
        }
        *balances
            .entry((token.clone(), *source))
            .or_insert(Decimal::ZERO) -= amount;
        *balances
            .entry((token.clone(), *dest))
            .or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    fn balance_of(&self, token: &TokenId, holder: &AccountId) -> Decimal {
        self.balances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(token.clone(), *holder))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Bank wrapper that fails the nth transfer. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone)]
pub struct FailingBank {
    inner: MemoryBank,
    /// 1-based ordinal of the transfer call that fails.
    fail_on_call: usize,
    calls: Arc<Mutex<usize>>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl FailingBank {
    #[must_use]
    pub fn new(inner: MemoryBank, fail_on_call: usize) -> Self {
        Self {
            inner,
            fail_on_call,
            calls: Arc::new(Mutex::new(0)),
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl ValueTransfer for FailingBank {
    fn transfer_from(
        &mut self,
        token: &TokenId,
        source: &AccountId,
        dest: &AccountId,
        amount: Decimal,
    ) -> Result<()> {
        let call = {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            *calls += 1;
            *calls
        };
        if call == self.fail_on_call {
            return Err(VoucherError::TransferFailed {
                token: token.clone(),
                reason: format!("injected failure on call {call}"),
            });
        }
        self.inner.transfer_from(token, source, dest, amount)
    }

    fn balance_of(&self, token: &TokenId, holder: &AccountId) -> Decimal {
        self.inner.balance_of(token, holder)
    }
}
