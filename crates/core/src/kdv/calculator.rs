//! KDV arithmetic.
//!
//! All operations take VAT-inclusive totals unless stated otherwise, compute
//! in exact decimal and round once at the end with [`round_money`].

use ecotrack_shared::config::KdvConfig;
use ecotrack_shared::types::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::KdvError;
use super::keywords::RateKeywords;
use super::rate::KdvRate;

/// KDV split of a VAT-inclusive total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdvBreakdown {
    /// VAT-inclusive total.
    pub total_amount: Decimal,
    /// Applied rate.
    pub kdv_rate: KdvRate,
    /// Tax contained in the total.
    pub kdv_amount: Decimal,
    /// Total minus tax.
    pub amount_without_kdv: Decimal,
}

/// KDV calculator.
///
/// Arithmetic is stateless; the instance only owns the keyword table used by
/// [`KdvCalculator::suggest_rate`].
#[derive(Debug, Clone, Default)]
pub struct KdvCalculator {
    keywords: RateKeywords,
}

impl KdvCalculator {
    /// Creates a calculator with the given keyword table.
    #[must_use]
    pub fn new(keywords: RateKeywords) -> Self {
        Self { keywords }
    }

    /// Creates a calculator from configuration.
    pub fn from_config(config: &KdvConfig) -> Result<Self, KdvError> {
        Ok(Self::new(RateKeywords::from_config(config)?))
    }

    /// The keyword table in use.
    #[must_use]
    pub fn keywords(&self) -> &RateKeywords {
        &self.keywords
    }

    /// Returns true iff `rate` is 1, 10 or 20 percent.
    #[must_use]
    pub fn validate_rate(rate: Decimal) -> bool {
        super::rate::validate_rate(rate)
    }

    /// Tax contained in a VAT-inclusive `total`: `total * rate / (100 + rate)`.
    ///
    /// # Errors
    ///
    /// Returns `KdvError::InvalidRate` if `rate` is not 1, 10 or 20, or
    /// `KdvError::AmountOutOfRange` if `total` is too large to compute with.
    pub fn kdv_amount(total: Decimal, rate: Decimal) -> Result<Decimal, KdvError> {
        let rate = parse_rate(rate)?;
        Ok(round_money(exact_kdv(total, rate.percent())?))
    }

    /// Net amount of a VAT-inclusive `total`: `total / (1 + rate / 100)`.
    ///
    /// # Errors
    ///
    /// Returns `KdvError::InvalidRate` if `rate` is not 1, 10 or 20.
    pub fn amount_without_kdv(total: Decimal, rate: Decimal) -> Result<Decimal, KdvError> {
        let rate = parse_rate(rate)?;
        Ok(round_money(exact_net(total, rate.percent())?))
    }

    /// VAT-inclusive total of a net `amount`: `amount * (1 + rate / 100)`.
    ///
    /// # Errors
    ///
    /// Returns `KdvError::InvalidRate` if `rate` is not 1, 10 or 20, or
    /// `KdvError::AmountOutOfRange` if the grossed-up total overflows.
    pub fn total_with_kdv(amount: Decimal, rate: Decimal) -> Result<Decimal, KdvError> {
        let rate = parse_rate(rate)?;
        amount
            .checked_mul(multiplier(rate.percent()))
            .map(round_money)
            .ok_or(KdvError::AmountOutOfRange(amount))
    }

    /// Full breakdown of a VAT-inclusive `total`.
    ///
    /// # Errors
    ///
    /// Returns `KdvError::InvalidRate` if `rate` is not 1, 10 or 20, or
    /// `KdvError::AmountOutOfRange` if `total` is too large to compute with.
    pub fn breakdown(total: Decimal, rate: Decimal) -> Result<KdvBreakdown, KdvError> {
        Self::breakdown_for(total, parse_rate(rate)?)
    }

    /// Full breakdown for an already validated rate.
    ///
    /// # Errors
    ///
    /// Returns `KdvError::AmountOutOfRange` if `total` is too large to compute
    /// with.
    pub fn breakdown_for(total: Decimal, rate: KdvRate) -> Result<KdvBreakdown, KdvError> {
        Ok(KdvBreakdown {
            total_amount: round_money(total),
            kdv_rate: rate,
            kdv_amount: round_money(exact_kdv(total, rate.percent())?),
            amount_without_kdv: round_money(exact_net(total, rate.percent())?),
        })
    }

    /// Suggests a rate for a category name or line description.
    #[must_use]
    pub fn suggest_rate(&self, text: &str) -> KdvRate {
        self.keywords.suggest(text)
    }
}

pub(super) fn parse_rate(rate: Decimal) -> Result<KdvRate, KdvError> {
    KdvRate::try_from(rate).inspect_err(|_| warn!(%rate, "Rejected invalid KDV rate"))
}

/// Unrounded tax part of `total`. A zero rate has no tax.
pub(super) fn exact_kdv(total: Decimal, rate: Decimal) -> Result<Decimal, KdvError> {
    if rate.is_zero() {
        return Ok(Decimal::ZERO);
    }
    total
        .checked_mul(rate)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED + rate))
        .ok_or(KdvError::AmountOutOfRange(total))
}

/// Unrounded net part of `total`.
pub(super) fn exact_net(total: Decimal, rate: Decimal) -> Result<Decimal, KdvError> {
    total
        .checked_div(multiplier(rate))
        .ok_or(KdvError::AmountOutOfRange(total))
}

fn multiplier(rate: Decimal) -> Decimal {
    Decimal::ONE + rate / Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(120.00), dec!(20), dec!(20.00), dec!(100.00))]
    #[case(dec!(110.00), dec!(10), dec!(10.00), dec!(100.00))]
    #[case(dec!(101.00), dec!(1), dec!(1.00), dec!(100.00))]
    #[case(dec!(100.00), dec!(20), dec!(16.67), dec!(83.33))]
    #[case(dec!(59.90), dec!(10), dec!(5.45), dec!(54.45))]
    #[case(dec!(0), dec!(20), dec!(0), dec!(0))]
    fn test_kdv_and_net(
        #[case] total: Decimal,
        #[case] rate: Decimal,
        #[case] kdv: Decimal,
        #[case] net: Decimal,
    ) {
        assert_eq!(KdvCalculator::kdv_amount(total, rate).unwrap(), kdv);
        assert_eq!(KdvCalculator::amount_without_kdv(total, rate).unwrap(), net);
    }

    #[test]
    fn test_midpoint_rounds_half_up() {
        // Each exact result ends in 5 at the third place; banker's rounding would go down.
        assert_eq!(
            KdvCalculator::kdv_amount(dec!(0.27), dec!(20)).unwrap(),
            dec!(0.05)
        );
        assert_eq!(
            KdvCalculator::amount_without_kdv(dec!(0.15), dec!(20)).unwrap(),
            dec!(0.13)
        );
        assert_eq!(
            KdvCalculator::total_with_kdv(dec!(0.0375), dec!(20)).unwrap(),
            dec!(0.05)
        );
    }

    #[test]
    fn test_total_with_kdv() {
        assert_eq!(
            KdvCalculator::total_with_kdv(dec!(100), dec!(20)).unwrap(),
            dec!(120.00)
        );
        assert_eq!(
            KdvCalculator::total_with_kdv(dec!(83.33), dec!(20)).unwrap(),
            dec!(100.00)
        );
        assert_eq!(
            KdvCalculator::total_with_kdv(dec!(54.45), dec!(10)).unwrap(),
            dec!(59.90)
        );
    }

    #[rstest]
    #[case(dec!(5))]
    #[case(dec!(0))]
    #[case(dec!(18))]
    fn test_invalid_rate_rejected_everywhere(#[case] rate: Decimal) {
        let expected = KdvError::invalid_rate(rate);
        assert_eq!(
            KdvCalculator::kdv_amount(dec!(100), rate).unwrap_err(),
            expected
        );
        assert_eq!(
            KdvCalculator::amount_without_kdv(dec!(100), rate).unwrap_err(),
            expected
        );
        assert_eq!(
            KdvCalculator::total_with_kdv(dec!(100), rate).unwrap_err(),
            expected
        );
        assert_eq!(
            KdvCalculator::breakdown(dec!(100), rate).unwrap_err(),
            expected
        );
    }

    #[test]
    fn test_zero_rate_formula_yields_zero_tax() {
        assert_eq!(exact_kdv(dec!(250), Decimal::ZERO), Ok(Decimal::ZERO));
        assert_eq!(exact_net(dec!(250), Decimal::ZERO), Ok(dec!(250)));
    }

    #[test]
    fn test_huge_amounts_are_out_of_range() {
        let huge = Decimal::MAX / dec!(10);
        assert_eq!(
            KdvCalculator::kdv_amount(huge, dec!(20)),
            Err(KdvError::AmountOutOfRange(huge))
        );
        assert_eq!(
            KdvCalculator::breakdown(huge, dec!(20)),
            Err(KdvError::AmountOutOfRange(huge))
        );
        assert_eq!(
            KdvCalculator::total_with_kdv(Decimal::MAX, dec!(10)),
            Err(KdvError::AmountOutOfRange(Decimal::MAX))
        );
        // Dividing by the multiplier only shrinks the amount.
        assert!(KdvCalculator::amount_without_kdv(huge, dec!(20)).is_ok());
    }

    #[test]
    fn test_large_amounts_below_the_limit_still_compute() {
        assert_eq!(
            KdvCalculator::kdv_amount(dec!(1200000000000000), dec!(20)).unwrap(),
            dec!(200000000000000.00)
        );
    }

    #[test]
    fn test_breakdown() {
        let breakdown = KdvCalculator::breakdown(dec!(120), dec!(20)).unwrap();
        assert_eq!(
            breakdown,
            KdvBreakdown {
                total_amount: dec!(120),
                kdv_rate: KdvRate::Standard,
                kdv_amount: dec!(20.00),
                amount_without_kdv: dec!(100.00),
            }
        );
    }

    #[test]
    fn test_breakdown_is_idempotent() {
        let first = KdvCalculator::breakdown(dec!(347.19), dec!(10)).unwrap();
        let second = KdvCalculator::breakdown(dec!(347.19), dec!(10)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_breakdown_serializes_with_api_field_names() {
        let breakdown = KdvCalculator::breakdown(dec!(110), dec!(10)).unwrap();
        let json = serde_json::to_value(breakdown).unwrap();
        assert_eq!(json["kdv_amount"], "10.00");
        assert_eq!(json["amount_without_kdv"], "100.00");
        assert_eq!(json["kdv_rate"], "10");
    }

    #[test]
    fn test_validate_rate() {
        assert!(KdvCalculator::validate_rate(dec!(10)));
        assert!(!KdvCalculator::validate_rate(dec!(8)));
    }

    #[test]
    fn test_suggest_rate_uses_owned_table() {
        let calculator = KdvCalculator::default();
        assert_eq!(calculator.suggest_rate("fresh bread"), KdvRate::Reduced);
        assert_eq!(calculator.suggest_rate("hotel stay"), KdvRate::Intermediate);
        assert_eq!(calculator.suggest_rate("laptop"), KdvRate::Standard);
        assert_eq!(calculator.suggest_rate("unknown widget"), KdvRate::Standard);

        let custom = KdvCalculator::new(RateKeywords::new(
            vec![(KdvRate::Intermediate, vec!["laptop".into()])],
            KdvRate::Reduced,
        ));
        assert_eq!(custom.suggest_rate("laptop"), KdvRate::Intermediate);
        assert_eq!(custom.suggest_rate("bread"), KdvRate::Reduced);
    }

    #[test]
    fn test_from_config() {
        let calculator = KdvCalculator::from_config(&KdvConfig::default()).unwrap();
        assert_eq!(calculator.keywords().default_rate(), KdvRate::Standard);
    }
}
