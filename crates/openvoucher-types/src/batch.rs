//! Batch mint request: four parallel arrays, applied all-or-nothing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{CodeFingerprint, TokenId, constants::MAX_BATCH_SIZE};

/// A batch of mint requests.
///
/// The four arrays are positional: entry `i` is
/// `(fingerprints[i], tokens[i], values[i], expiry_days[i])`. Shape is
/// validated before any entry is processed; a batch is logically
/// equivalent to minting each entry independently, except that it commits
/// or aborts as a single unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MintBatch {
    pub fingerprints: Vec<CodeFingerprint>,
    pub tokens: Vec<TokenId>,
    pub values: Vec<Decimal>,
    pub expiry_days: Vec<u32>,
}

impl MintBatch {
    #[must_use]
    pub fn new(
        fingerprints: Vec<CodeFingerprint>,
        tokens: Vec<TokenId>,
        values: Vec<Decimal>,
        expiry_days: Vec<u32>,
    ) -> Self {
        Self {
            fingerprints,
            tokens,
            values,
            expiry_days,
        }
    }

    /// Number of entries, by the fingerprint array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    /// Validate the batch shape: all four arrays length-matched, at least
    /// one entry, at most [`MAX_BATCH_SIZE`] entries.
    ///
    /// # Errors
    /// Returns [`VoucherError::InvalidBatchSize`] naming the offending shape.
    ///
    /// [`VoucherError::InvalidBatchSize`]: crate::VoucherError::InvalidBatchSize
    pub fn check_shape(&self) -> crate::Result<()> {
        let n = self.len();
        if self.tokens.len() != n || self.values.len() != n || self.expiry_days.len() != n {
            return Err(crate::VoucherError::InvalidBatchSize {
                reason: format!(
                    "array lengths differ: fingerprints={n}, tokens={}, values={}, expiry_days={}",
                    self.tokens.len(),
                    self.values.len(),
                    self.expiry_days.len()
                ),
            });
        }
        if n == 0 {
            return Err(crate::VoucherError::InvalidBatchSize {
                reason: "batch is empty".to_string(),
            });
        }
        if n > MAX_BATCH_SIZE {
            return Err(crate::VoucherError::InvalidBatchSize {
                reason: format!("{n} entries exceeds maximum of {MAX_BATCH_SIZE}"),
            });
        }
        Ok(())
    }
}
