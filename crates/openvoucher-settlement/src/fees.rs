//! Basis-point fee math.
//!
//! All fees floor: `fee = ⌊value × rate_bps / 10000⌋`. A fee never rounds
//! up and a zero value or zero rate always yields a zero fee.

use rust_decimal::Decimal;

use openvoucher_types::constants::{BPS_DENOMINATOR, MAX_FEE_BPS};

/// Floor basis-point fee on `value`.
///
/// Pure and total: defined for every non-negative value and any rate.
#[must_use]
pub fn basis_point_fee(value: Decimal, rate_bps: u32) -> Decimal {
    (value * Decimal::from(rate_bps) / Decimal::from(BPS_DENOMINATOR)).floor()
}

/// The live minting/redemption fee rates.
///
/// Both rates are capped at 500 bps (5%), checked at construction and on
/// every update — an update that fails leaves both rates unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeeSchedule {
    minting_fee_bps: u32,
    redemption_fee_bps: u32,
}

impl FeeSchedule {
    /// # Errors
    /// Returns [`VoucherError::FeeTooHigh`] if either rate exceeds 500 bps.
    ///
    /// [`VoucherError::FeeTooHigh`]: openvoucher_types::VoucherError::FeeTooHigh
    pub fn new(minting_fee_bps: u32, redemption_fee_bps: u32) -> openvoucher_types::Result<Self> {
        Self::check_rate(minting_fee_bps)?;
        Self::check_rate(redemption_fee_bps)?;
        Ok(Self {
            minting_fee_bps,
            redemption_fee_bps,
        })
    }

    /// Replace both rates. Checks both caps before mutating either.
    pub fn update(
        &mut self,
        minting_fee_bps: u32,
        redemption_fee_bps: u32,
    ) -> openvoucher_types::Result<()> {
        Self::check_rate(minting_fee_bps)?;
        Self::check_rate(redemption_fee_bps)?;
        self.minting_fee_bps = minting_fee_bps;
        self.redemption_fee_bps = redemption_fee_bps;
        Ok(())
    }

    fn check_rate(rate_bps: u32) -> openvoucher_types::Result<()> {
        if rate_bps > MAX_FEE_BPS {
            return Err(openvoucher_types::VoucherError::FeeTooHigh { rate_bps });
        }
        Ok(())
    }

    #[must_use]
    pub fn minting_fee_bps(&self) -> u32 {
        self.minting_fee_bps
    }

    #[must_use]
    pub fn redemption_fee_bps(&self) -> u32 {
        self.redemption_fee_bps
    }

    /// Fee charged to the issuer on mint.
    #[must_use]
    pub fn minting_fee(&self, value: Decimal) -> Decimal {
        basis_point_fee(value, self.minting_fee_bps)
    }

    /// Fee withheld from the recipient on redeem.
    #[must_use]
    pub fn redemption_fee(&self, value: Decimal) -> Decimal {
        basis_point_fee(value, self.redemption_fee_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openvoucher_types::VoucherError;

    #[test]
    fn fee_is_exact_on_even_values() {
        // 100 * 10^18 at 200 bps must be exactly 2 * 10^18.
        let value = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
        let expected = Decimal::from_i128_with_scale(2_000_000_000_000_000_000, 0);
        assert_eq!(basis_point_fee(value, 200), expected);
    }

    #[test]
    fn fee_floors_never_rounds_up() {
        // 999 * 250 / 10000 = 24.975 → 24
        assert_eq!(basis_point_fee(Decimal::new(999, 0), 250), Decimal::new(24, 0));
        // 1 * 1 / 10000 = 0.0001 → 0
        assert_eq!(basis_point_fee(Decimal::ONE, 1), Decimal::ZERO);
    }

    #[test]
    fn zero_value_zero_fee() {
        assert_eq!(basis_point_fee(Decimal::ZERO, 500), Decimal::ZERO);
    }

    #[test]
    fn zero_rate_zero_fee() {
        assert_eq!(basis_point_fee(Decimal::new(12345, 0), 0), Decimal::ZERO);
    }

    #[test]
    fn schedule_caps_enforced() {
        let err = FeeSchedule::new(501, 0).unwrap_err();
        assert!(matches!(err, VoucherError::FeeTooHigh { rate_bps: 501 }));
        let err = FeeSchedule::new(0, 501).unwrap_err();
        assert!(matches!(err, VoucherError::FeeTooHigh { rate_bps: 501 }));
        assert!(FeeSchedule::new(500, 500).is_ok());
    }

    #[test]
    fn failed_update_leaves_rates_unchanged() {
        let mut schedule = FeeSchedule::new(200, 100).unwrap();
        let err = schedule.update(300, 9999).unwrap_err();
        assert!(matches!(err, VoucherError::FeeTooHigh { rate_bps: 9999 }));
        assert_eq!(schedule.minting_fee_bps(), 200);
        assert_eq!(schedule.redemption_fee_bps(), 100);
    }

    #[test]
    fn update_replaces_both_rates() {
        let mut schedule = FeeSchedule::new(200, 100).unwrap();
        schedule.update(50, 75).unwrap();
        assert_eq!(schedule.minting_fee_bps(), 50);
        assert_eq!(schedule.redemption_fee_bps(), 75);
    }

    #[test]
    fn schedule_fee_helpers() {
        let schedule = FeeSchedule::new(200, 100).unwrap();
        let value = Decimal::new(10_000, 0);
        assert_eq!(schedule.minting_fee(value), Decimal::new(200, 0));
        assert_eq!(schedule.redemption_fee(value), Decimal::new(100, 0));
    }
}
