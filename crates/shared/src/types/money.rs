//! Money rounding with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on every public monetary result.
pub const MONEY_DP: u32 = 2;

/// Rounds a value to [`MONEY_DP`] places using round-half-up.
///
/// `0.125` becomes `0.13`, never `0.12` as banker's rounding would give.
/// Negative midpoints round away from zero. The result always carries
/// exactly two decimal places, so `20` comes back as `20.00`.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DP);
    rounded
}

/// Sums `values`, or `None` if the total leaves the `Decimal` range.
#[must_use]
pub fn checked_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}

/// Returns true when `a` and `b` differ by at most one cent.
#[must_use]
pub fn within_cent(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= Decimal::new(1, MONEY_DP)
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
