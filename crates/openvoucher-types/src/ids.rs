//! Identifiers used throughout OpenVoucher.
//!
//! Voucher identity is a SHA-256 *code fingerprint* — the one-way digest of
//! a human-readable secret code. The plaintext code is never stored anywhere
//! in the system; possession of the plaintext is the redemption capability.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CodeFingerprint
// ---------------------------------------------------------------------------

/// One-way digest of a voucher's secret code.
///
/// Derived as `SHA-256("openvoucher:code:v1:" || code)`. Deterministic: the
/// same plaintext always yields the same fingerprint, so redeem and reclaim
/// can recompute it from the presented code and match it against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CodeFingerprint(pub [u8; 32]);

impl CodeFingerprint {
    /// Derive the fingerprint from a plaintext code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"openvoucher:code:v1:");
        hasher.update(code.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full lowercase hex encoding (64 chars).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a fingerprint from its 64-char hex encoding.
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let raw = hex::decode(s)
            .map_err(|e| crate::VoucherError::Serialization(format!("bad fingerprint hex: {e}")))?;
        let bytes: [u8; 32] = raw.try_into().map_err(|_| {
            crate::VoucherError::Serialization("fingerprint must be 32 bytes".to_string())
        })?;
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for CodeFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vch:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// Opaque 32-byte account identity: agents, recipients, the treasury, and
/// the pool's own custody account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acct:{}", hex::encode(&self.0[..8]))
    }
}

/// Random account for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl AccountId {
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }
}

// ---------------------------------------------------------------------------
// TokenId
// ---------------------------------------------------------------------------

/// A supported value-unit type (e.g., "USDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TokenId(pub String);

impl TokenId {
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
