//! The voucher ledger: fingerprint → record map and the lifecycle state
//! machine around it.
//!
//! Records are never removed. A terminal voucher stays in the map so a
//! spent code can never be re-minted and auditors can replay history.

use std::collections::HashMap;

use openvoucher_types::{
    CodeFingerprint, Result, TokenId, Voucher, VoucherError, VoucherStatus,
};
use rust_decimal::Decimal;

/// Owns every voucher record, keyed by code fingerprint.
#[derive(Debug, Clone, Default)]
pub struct VoucherLedger {
    vouchers: HashMap<CodeFingerprint, Voucher>,
}

impl VoucherLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, fingerprint: &CodeFingerprint) -> bool {
        self.vouchers.contains_key(fingerprint)
    }

    /// Fail with `DuplicateVoucherCode` if the fingerprint is taken.
    /// Duplicate detection covers terminal records too — a spent code can
    /// never be minted again.
    pub fn check_available(&self, fingerprint: &CodeFingerprint) -> Result<()> {
        if self.contains(fingerprint) {
            return Err(VoucherError::DuplicateVoucherCode(*fingerprint));
        }
        Ok(())
    }

    /// Insert a freshly minted voucher.
    ///
    /// # Errors
    /// Returns [`VoucherError::DuplicateVoucherCode`] if a record with this
    /// fingerprint already exists.
    pub fn insert(&mut self, voucher: Voucher) -> Result<()> {
        self.check_available(&voucher.fingerprint)?;
        self.vouchers.insert(voucher.fingerprint, voucher);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, fingerprint: &CodeFingerprint) -> Option<&Voucher> {
        self.vouchers.get(fingerprint)
    }

    /// Look up a voucher that must exist.
    ///
    /// # Errors
    /// Returns [`VoucherError::VoucherNotFound`] otherwise.
    pub fn require(&self, fingerprint: &CodeFingerprint) -> Result<&Voucher> {
        self.vouchers
            .get(fingerprint)
            .ok_or(VoucherError::VoucherNotFound(*fingerprint))
    }

    /// Apply the terminal transition to a stored voucher.
    ///
    /// # Errors
    /// - [`VoucherError::VoucherNotFound`] if no record exists
    /// - [`VoucherError::VoucherAlreadyRedeemed`] on a second terminal
    ///   transition
    pub fn mark_redeemed(&mut self, fingerprint: &CodeFingerprint) -> Result<()> {
        let voucher = self
            .vouchers
            .get_mut(fingerprint)
            .ok_or(VoucherError::VoucherNotFound(*fingerprint))?;
        voucher.mark_redeemed()
    }

    /// Read-only projection; never-minted fingerprints get the zero-valued
    /// status.
    #[must_use]
    pub fn status(&self, fingerprint: &CodeFingerprint) -> VoucherStatus {
        self.vouchers
            .get(fingerprint)
            .map_or_else(VoucherStatus::nonexistent, VoucherStatus::from)
    }

    /// Σ value over outstanding (unredeemed) vouchers of a token.
    ///
    /// O(n) over the ledger — an audit helper, not part of the hot path;
    /// incremental custody tracking lives in the settlement engine.
    #[must_use]
    pub fn outstanding_value(&self, token: &TokenId) -> Decimal {
        self.vouchers
            .values()
            .filter(|v| !v.redeemed && v.token == *token)
            .map(|v| v.value)
            .sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vouchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vouchers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn insert_and_lookup() {
        let mut ledger = VoucherLedger::new();
        let voucher = Voucher::dummy("CODE-1", "USDT", dec(100));
        let fp = voucher.fingerprint;
        ledger.insert(voucher).unwrap();

        assert!(ledger.contains(&fp));
        assert_eq!(ledger.require(&fp).unwrap().value, dec(100));
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut ledger = VoucherLedger::new();
        let voucher = Voucher::dummy("CODE-1", "USDT", dec(100));
        let fp = voucher.fingerprint;
        ledger.insert(voucher.clone()).unwrap();

        let err = ledger.insert(voucher).unwrap_err();
        assert!(matches!(err, VoucherError::DuplicateVoucherCode(d) if d == fp));
    }

    #[test]
    fn spent_code_stays_taken() {
        let mut ledger = VoucherLedger::new();
        let voucher = Voucher::dummy("CODE-1", "USDT", dec(100));
        let fp = voucher.fingerprint;
        ledger.insert(voucher.clone()).unwrap();
        ledger.mark_redeemed(&fp).unwrap();

        // Terminal records still block re-minting.
        assert!(ledger.check_available(&fp).is_err());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn missing_voucher_not_found() {
        let ledger = VoucherLedger::new();
        let fp = CodeFingerprint::from_code("never-minted");
        let err = ledger.require(&fp).unwrap_err();
        assert!(matches!(err, VoucherError::VoucherNotFound(f) if f == fp));
    }

    #[test]
    fn double_terminal_transition_rejected() {
        let mut ledger = VoucherLedger::new();
        let voucher = Voucher::dummy("CODE-1", "USDT", dec(100));
        let fp = voucher.fingerprint;
        ledger.insert(voucher).unwrap();

        ledger.mark_redeemed(&fp).unwrap();
        let err = ledger.mark_redeemed(&fp).unwrap_err();
        assert!(matches!(err, VoucherError::VoucherAlreadyRedeemed(f) if f == fp));
    }

    #[test]
    fn status_for_unknown_fingerprint_is_zero_valued() {
        let ledger = VoucherLedger::new();
        let status = ledger.status(&CodeFingerprint::from_code("nope"));
        assert!(!status.exists);
        assert_eq!(status.value, Decimal::ZERO);
    }

    #[test]
    fn outstanding_value_excludes_redeemed() {
        let mut ledger = VoucherLedger::new();
        let usdt = TokenId::new("USDT");

        let a = Voucher::dummy("A", "USDT", dec(100));
        let b = Voucher::dummy("B", "USDT", dec(250));
        let c = Voucher::dummy("C", "DAI", dec(999));
        let fp_a = a.fingerprint;
        ledger.insert(a).unwrap();
        ledger.insert(b).unwrap();
        ledger.insert(c).unwrap();

        assert_eq!(ledger.outstanding_value(&usdt), dec(350));
        ledger.mark_redeemed(&fp_a).unwrap();
        assert_eq!(ledger.outstanding_value(&usdt), dec(250));
    }
}
