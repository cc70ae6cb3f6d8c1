//! Mixed-rate receipts: totals across lines with different KDV rates.

use std::collections::BTreeMap;

use ecotrack_shared::types::{checked_sum, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::{KdvCalculator, exact_kdv, exact_net, parse_rate};
use super::error::KdvError;
use super::rate::KdvRate;

/// One VAT-inclusive receipt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdvItem {
    /// VAT-inclusive amount.
    pub amount: Decimal,
    /// KDV rate in percent.
    pub rate: Decimal,
}

/// Subtotal of all lines sharing one rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSubtotal {
    /// Rate of this group.
    pub kdv_rate: KdvRate,
    /// VAT-inclusive total.
    pub total_amount: Decimal,
    /// Tax total.
    pub kdv_amount: Decimal,
    /// Net total.
    pub amount_without_kdv: Decimal,
    /// Number of lines in the group.
    pub item_count: usize,
}

/// Totals of a mixed-rate receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedKdvSummary {
    /// VAT-inclusive grand total.
    pub total_amount: Decimal,
    /// Tax grand total.
    pub total_kdv: Decimal,
    /// Net grand total.
    pub total_without_kdv: Decimal,
    /// `total_kdv / total_without_kdv * 100`, or 0 for an empty net total.
    pub effective_rate: Decimal,
    /// Per-rate subtotals in ascending rate order.
    pub by_rate: Vec<RateSubtotal>,
}

#[derive(Default)]
struct Accumulator {
    total: Decimal,
    kdv: Decimal,
    net: Decimal,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, amount: Decimal, rate: KdvRate) -> Result<(), KdvError> {
        let out_of_range = || KdvError::AmountOutOfRange(amount);
        let kdv = exact_kdv(amount, rate.percent())?;
        let net = exact_net(amount, rate.percent())?;

        self.total = self.total.checked_add(amount).ok_or_else(out_of_range)?;
        self.kdv = self.kdv.checked_add(kdv).ok_or_else(out_of_range)?;
        self.net = self.net.checked_add(net).ok_or_else(out_of_range)?;
        self.count += 1;
        Ok(())
    }
}

impl KdvCalculator {
    /// Aggregates lines with possibly different rates.
    ///
    /// Per-line values stay unrounded while summing; each reported field is
    /// rounded once.
    ///
    /// # Errors
    ///
    /// Returns `KdvError::InvalidRate` if any line carries an invalid rate, or
    /// `KdvError::AmountOutOfRange` if the receipt totals overflow.
    pub fn mixed_total(items: &[KdvItem]) -> Result<MixedKdvSummary, KdvError> {
        let mut groups: BTreeMap<KdvRate, Accumulator> = BTreeMap::new();

        for item in items {
            let rate = parse_rate(item.rate)?;
            groups.entry(rate).or_default().add(item.amount, rate)?;
        }

        let grand_total = |field: fn(&Accumulator) -> Decimal| {
            checked_sum(groups.values().map(field))
                .map(round_money)
                .ok_or(KdvError::AmountOutOfRange(Decimal::MAX))
        };
        let total_amount = grand_total(|g| g.total)?;
        let total_kdv = grand_total(|g| g.kdv)?;
        let total_without_kdv = grand_total(|g| g.net)?;

        let effective_rate = if total_without_kdv.is_zero() {
            round_money(Decimal::ZERO)
        } else {
            total_kdv
                .checked_div(total_without_kdv)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(round_money)
                .ok_or(KdvError::AmountOutOfRange(total_kdv))?
        };

        let by_rate = groups
            .into_iter()
            .map(|(rate, group)| RateSubtotal {
                kdv_rate: rate,
                total_amount: round_money(group.total),
                kdv_amount: round_money(group.kdv),
                amount_without_kdv: round_money(group.net),
                item_count: group.count,
            })
            .collect();

        Ok(MixedKdvSummary {
            total_amount,
            total_kdv,
            total_without_kdv,
            effective_rate,
            by_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(amount: Decimal, rate: Decimal) -> KdvItem {
        KdvItem { amount, rate }
    }

    #[test]
    fn test_mixed_receipt() {
        let items = [
            item(dec!(120), dec!(20)),
            item(dec!(110), dec!(10)),
            item(dec!(101), dec!(1)),
            item(dec!(60), dec!(20)),
        ];

        let summary = KdvCalculator::mixed_total(&items).unwrap();

        assert_eq!(summary.total_amount, dec!(391.00));
        assert_eq!(summary.total_kdv, dec!(41.00));
        assert_eq!(summary.total_without_kdv, dec!(350.00));
        // 41 / 350 * 100 = 11.714..
        assert_eq!(summary.effective_rate, dec!(11.71));

        let rates: Vec<KdvRate> = summary.by_rate.iter().map(|s| s.kdv_rate).collect();
        assert_eq!(
            rates,
            vec![KdvRate::Reduced, KdvRate::Intermediate, KdvRate::Standard]
        );

        let standard = &summary.by_rate[2];
        assert_eq!(standard.item_count, 2);
        assert_eq!(standard.total_amount, dec!(180.00));
        assert_eq!(standard.kdv_amount, dec!(30.00));
        assert_eq!(standard.amount_without_kdv, dec!(150.00));
    }

    #[test]
    fn test_rounds_once_at_the_end() {
        // Each line: 0.10 * 20 / 120 = 0.01666.. -> 0.02 if rounded per line.
        let items = vec![item(dec!(0.10), dec!(20)); 3];
        let summary = KdvCalculator::mixed_total(&items).unwrap();
        // 3 * 0.01666.. = 0.05, not 3 * 0.02 = 0.06.
        assert_eq!(summary.total_kdv, dec!(0.05));
        assert_eq!(summary.total_amount, dec!(0.30));
        assert_eq!(summary.total_without_kdv, dec!(0.25));
    }

    #[test]
    fn test_empty_receipt() {
        let summary = KdvCalculator::mixed_total(&[]).unwrap();
        assert_eq!(summary.total_amount, Decimal::ZERO);
        assert_eq!(summary.effective_rate, Decimal::ZERO);
        assert!(summary.by_rate.is_empty());
    }

    #[test]
    fn test_zero_amount_lines_have_zero_effective_rate() {
        let summary = KdvCalculator::mixed_total(&[item(dec!(0), dec!(10))]).unwrap();
        assert_eq!(summary.effective_rate, Decimal::ZERO);
        assert_eq!(summary.by_rate[0].item_count, 1);
    }

    #[test]
    fn test_any_invalid_line_fails_the_receipt() {
        let items = [item(dec!(50), dec!(20)), item(dec!(50), dec!(8))];
        assert_eq!(
            KdvCalculator::mixed_total(&items).unwrap_err(),
            KdvError::invalid_rate(dec!(8))
        );
    }

    #[test]
    fn test_overflowing_receipt_is_out_of_range() {
        let half = Decimal::MAX / dec!(2);
        // Each line on its own is fine; the running total is not.
        let items = [item(half, dec!(1)), item(half, dec!(1)), item(half, dec!(1))];
        assert_eq!(
            KdvCalculator::mixed_total(&items).unwrap_err(),
            KdvError::AmountOutOfRange(half)
        );

        let huge = Decimal::MAX / dec!(10);
        assert_eq!(
            KdvCalculator::mixed_total(&[item(huge, dec!(20))]).unwrap_err(),
            KdvError::AmountOutOfRange(huge)
        );
    }
}
