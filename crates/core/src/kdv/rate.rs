//! The three legally valid KDV rates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::KdvError;

/// A valid Turkish KDV rate.
///
/// Serialized as its percent number, so `KdvRate::Standard` is `20`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub enum KdvRate {
    /// 1%: staple foods, health, education.
    Reduced,
    /// 10%: housing, culture, tourism, food service.
    Intermediate,
    /// 20%: general rate.
    #[default]
    Standard,
}

impl KdvRate {
    /// All valid rates in ascending order.
    pub const ALL: [Self; 3] = [Self::Reduced, Self::Intermediate, Self::Standard];

    /// Returns the rate in percent.
    #[must_use]
    pub fn percent(self) -> Decimal {
        match self {
            Self::Reduced => Decimal::ONE,
            Self::Intermediate => Decimal::TEN,
            Self::Standard => Decimal::from(20),
        }
    }
}

impl TryFrom<Decimal> for KdvRate {
    type Error = KdvError;

    fn try_from(rate: Decimal) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|valid| valid.percent() == rate)
            .ok_or_else(|| KdvError::invalid_rate(rate))
    }
}

impl From<KdvRate> for Decimal {
    fn from(rate: KdvRate) -> Self {
        rate.percent()
    }
}

impl std::fmt::Display for KdvRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Returns true iff `rate` is one of 1, 10 or 20 percent.
#[must_use]
pub fn validate_rate(rate: Decimal) -> bool {
    KdvRate::try_from(rate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(1), true)]
    #[case(dec!(1.0), true)]
    #[case(dec!(10), true)]
    #[case(dec!(20.00), true)]
    #[case(dec!(0), false)]
    #[case(dec!(5), false)]
    #[case(dec!(8), false)]
    #[case(dec!(18), false)]
    #[case(dec!(-20), false)]
    fn test_validate_rate(#[case] rate: Decimal, #[case] expected: bool) {
        assert_eq!(validate_rate(rate), expected);
    }

    #[test]
    fn test_try_from_maps_each_rate() {
        assert_eq!(KdvRate::try_from(dec!(1)).unwrap(), KdvRate::Reduced);
        assert_eq!(KdvRate::try_from(dec!(10)).unwrap(), KdvRate::Intermediate);
        assert_eq!(KdvRate::try_from(dec!(20)).unwrap(), KdvRate::Standard);
    }

    #[test]
    fn test_invalid_rate_error_carries_rate_and_valid_set() {
        let err = KdvRate::try_from(dec!(5)).unwrap_err();
        assert_eq!(
            err,
            KdvError::InvalidRate {
                rate: dec!(5),
                valid: [dec!(1), dec!(10), dec!(20)],
            }
        );
        assert_eq!(err.to_string(), "Invalid KDV rate: 5% (valid rates: [1, 10, 20])");
    }

    #[test]
    fn test_ordering_and_display() {
        assert!(KdvRate::Reduced < KdvRate::Intermediate);
        assert!(KdvRate::Intermediate < KdvRate::Standard);
        assert_eq!(KdvRate::Standard.to_string(), "20%");
        assert_eq!(KdvRate::default(), KdvRate::Standard);
    }

    #[test]
    fn test_serde_as_percent_number() {
        let json = serde_json::to_string(&KdvRate::Intermediate).unwrap();
        assert_eq!(json, "\"10\"");
        let parsed: KdvRate = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, KdvRate::Reduced);
        assert!(serde_json::from_str::<KdvRate>("5").is_err());
    }
}
