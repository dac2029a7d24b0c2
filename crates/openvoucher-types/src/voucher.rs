//! # Voucher — the custody-backed redemption primitive
//!
//! A `Voucher` is a **prepaid claim** on pool custody, created when an agent
//! mints against a secret code and consumed when a holder presents that code.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────────┐   mint    ┌────────┐  redeem / reclaim  ┌──────────┐
//!   │ NONEXISTENT ├──────────▶│ ACTIVE ├───────────────────▶│ REDEEMED │
//!   └─────────────┘           └────────┘                    └──────────┘
//! ```
//!
//! ## Properties
//!
//! - **Fingerprint-keyed**: only the SHA-256 fingerprint of the secret code
//!   is stored; presenting the plaintext is the redemption capability
//! - **Single terminal transition**: `redeemed` flips false→true exactly
//!   once — redeem and reclaim both land in the same terminal state,
//!   distinguishable only by which actor triggered it
//! - **Immutable record**: every attribute except `redeemed` is fixed at
//!   mint time; records are never deleted (retained for audit and
//!   duplicate detection)
//! - **Time-bound**: a voucher with an expiry stops being redeemable at
//!   `expires_at` and becomes reclaimable by its issuer at the same instant

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, CodeFingerprint, TokenId};

/// The lifecycle state of a voucher.
///
/// Transitions are **monotonic** (never go backwards):
/// - `Nonexistent → Active` (mint)
/// - `Active → Redeemed` (redeem or reclaim; irreversible)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoucherState {
    /// No voucher exists for this fingerprint.
    Nonexistent,
    /// The voucher is live: redeemable until expiry, reclaimable after.
    Active,
    /// Terminal. The underlying value has left the pool.
    /// **Irreversible.** This is what prevents double-redemption.
    Redeemed,
}

impl VoucherState {
    /// Can this voucher transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Nonexistent, Self::Active) | (Self::Active, Self::Redeemed)
        )
    }
}

impl std::fmt::Display for VoucherState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nonexistent => write!(f, "NONEXISTENT"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Redeemed => write!(f, "REDEEMED"),
        }
    }
}

/// A voucher record: an agent's prepaid, code-locked claim on pool custody.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    /// Fingerprint of the secret code (the ledger key).
    pub fingerprint: CodeFingerprint,
    /// The value-unit type backing this voucher.
    pub token: TokenId,
    /// Redeemable amount, excluding fees. Strictly positive.
    pub value: Decimal,
    /// The agent that minted (and prefunded) this voucher.
    pub issuer: AccountId,
    /// Terminal flag — set by redeem **and** reclaim.
    pub redeemed: bool,
    /// When the voucher was minted.
    pub created_at: DateTime<Utc>,
    /// When the voucher expires. `None` = never expires (and can
    /// therefore never be reclaimed).
    pub expires_at: Option<DateTime<Utc>>,
}

impl Voucher {
    /// Current lifecycle state of this record.
    ///
    /// `Nonexistent` is represented by absence from the ledger, so a
    /// stored record is always `Active` or `Redeemed`.
    #[must_use]
    pub fn state(&self) -> VoucherState {
        if self.redeemed {
            VoucherState::Redeemed
        } else {
            VoucherState::Active
        }
    }

    /// Whether the voucher is past its expiry at `now`.
    ///
    /// Boundary policy: expired iff `now >= expires_at`. A voucher with
    /// no expiry never expires.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Attempt the terminal transition.
    ///
    /// # Errors
    /// Returns [`VoucherError::VoucherAlreadyRedeemed`] if the voucher is
    /// already terminal — exactly one terminal transition ever succeeds.
    ///
    /// [`VoucherError::VoucherAlreadyRedeemed`]: crate::VoucherError::VoucherAlreadyRedeemed
    pub fn mark_redeemed(&mut self) -> crate::Result<()> {
        if !self.state().can_transition_to(VoucherState::Redeemed) {
            return Err(crate::VoucherError::VoucherAlreadyRedeemed(self.fingerprint));
        }
        self.redeemed = true;
        Ok(())
    }
}

/// Read-only projection of a voucher record.
///
/// A fingerprint never minted projects to the zero-valued status
/// (`exists == false`), mirroring how the ledger answers point lookups
/// without revealing whether a code was ever close to valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherStatus {
    pub exists: bool,
    pub redeemed: bool,
    pub token: Option<TokenId>,
    pub value: Decimal,
    pub issuer: Option<AccountId>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl VoucherStatus {
    /// Status of a fingerprint with no ledger record.
    #[must_use]
    pub fn nonexistent() -> Self {
        Self {
            exists: false,
            redeemed: false,
            token: None,
            value: Decimal::ZERO,
            issuer: None,
            expires_at: None,
        }
    }
}

impl From<&Voucher> for VoucherStatus {
    fn from(voucher: &Voucher) -> Self {
        Self {
            exists: true,
            redeemed: voucher.redeemed,
            token: Some(voucher.token.clone()),
            value: voucher.value,
            issuer: Some(voucher.issuer),
            expires_at: voucher.expires_at,
        }
    }
}

/// Dummy voucher for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Voucher {
    /// Create a dummy active voucher for unit tests.
    pub fn dummy(code: &str, token: &str, value: Decimal) -> Self {
        let now = Utc::now();
        Self {
            fingerprint: CodeFingerprint::from_code(code),
            token: TokenId::new(token),
            value,
            issuer: AccountId::random(),
            redeemed: false,
            created_at: now,
            expires_at: Some(now + chrono::Duration::days(30)),
        }
    }
}
