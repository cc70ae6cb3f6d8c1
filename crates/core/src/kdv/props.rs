//! Property-based tests for KDV arithmetic.

use ecotrack_shared::types::within_cent;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::KdvCalculator;
use super::mixed::KdvItem;
use super::rate::KdvRate;

/// Strategy to generate cent totals (0.00 to 1,000,000.00).
fn cent_total() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to pick one of the valid rates.
fn valid_rate() -> impl Strategy<Value = Decimal> {
    prop::sample::select(KdvRate::ALL.to_vec()).prop_map(KdvRate::percent)
}

/// Strategy to generate rates that are not valid KDV rates.
fn invalid_rate() -> impl Strategy<Value = Decimal> {
    (-10_000i64..10_000i64)
        .prop_map(|v| Decimal::new(v, 2))
        .prop_filter("must not be a valid rate", |r| {
            !KdvRate::ALL.iter().any(|valid| valid.percent() == *r)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Net plus tax reconstructs the total within one cent.
    #[test]
    fn prop_net_plus_kdv_equals_total(total in cent_total(), rate in valid_rate()) {
        let kdv = KdvCalculator::kdv_amount(total, rate).unwrap();
        let net = KdvCalculator::amount_without_kdv(total, rate).unwrap();
        prop_assert!(
            within_cent(net + kdv, total),
            "{} + {} should be within a cent of {}", net, kdv, total
        );
    }

    /// Grossing up the net amount gets back to the total within one cent.
    #[test]
    fn prop_round_trip_through_total_with_kdv(total in cent_total(), rate in valid_rate()) {
        let net = KdvCalculator::amount_without_kdv(total, rate).unwrap();
        let back = KdvCalculator::total_with_kdv(net, rate).unwrap();
        prop_assert!(within_cent(back, total), "{} -> {} -> {}", total, net, back);
    }

    /// Results always carry exactly two decimal places.
    #[test]
    fn prop_results_have_two_decimals(total in cent_total(), rate in valid_rate()) {
        let breakdown = KdvCalculator::breakdown(total, rate).unwrap();
        prop_assert_eq!(breakdown.kdv_amount.scale(), 2);
        prop_assert_eq!(breakdown.amount_without_kdv.scale(), 2);
    }

    /// Breakdown is a pure function of its inputs.
    #[test]
    fn prop_breakdown_is_deterministic(total in cent_total(), rate in valid_rate()) {
        prop_assert_eq!(
            KdvCalculator::breakdown(total, rate).unwrap(),
            KdvCalculator::breakdown(total, rate).unwrap()
        );
    }

    /// Any rate outside {1, 10, 20} is rejected.
    #[test]
    fn prop_invalid_rates_rejected(total in cent_total(), rate in invalid_rate()) {
        prop_assert!(KdvCalculator::kdv_amount(total, rate).is_err());
        prop_assert!(KdvCalculator::amount_without_kdv(total, rate).is_err());
        prop_assert!(KdvCalculator::total_with_kdv(total, rate).is_err());
    }

    /// A single-line receipt matches the plain breakdown.
    #[test]
    fn prop_single_line_mixed_matches_breakdown(total in cent_total(), rate in valid_rate()) {
        let summary = KdvCalculator::mixed_total(&[KdvItem { amount: total, rate }]).unwrap();
        let breakdown = KdvCalculator::breakdown(total, rate).unwrap();
        prop_assert_eq!(summary.total_kdv, breakdown.kdv_amount);
        prop_assert_eq!(summary.total_without_kdv, breakdown.amount_without_kdv);
        prop_assert_eq!(summary.by_rate.len(), 1);
    }
}
