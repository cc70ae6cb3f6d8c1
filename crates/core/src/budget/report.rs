//! Evaluation of allocations against spend totals from the reporting layer.

use std::collections::BTreeMap;

use ecotrack_shared::types::{checked_sum, round_money};
use rust_decimal::Decimal;
use tracing::debug;

use super::allocator::BudgetAllocator;
use super::error::BudgetError;
use super::types::{
    BudgetReport, BudgetReportSummary, BudgetStatus, CategoryAllocation, CategoryBudget,
    SpendingShare,
};

impl BudgetAllocator {
    /// Evaluates every allocation against `spent_by_category`.
    ///
    /// Allocated categories with no spend entry count as zero spent. Spend in
    /// categories without an allocation is reported as `unbudgeted_spent`.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::AmountOutOfRange` if a total overflows.
    pub fn build_report(
        allocations: &[CategoryAllocation],
        spent_by_category: &BTreeMap<String, Decimal>,
    ) -> Result<BudgetReport, BudgetError> {
        let categories = allocations
            .iter()
            .map(|allocation| {
                let spent = spent_by_category
                    .get(&allocation.category)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                Ok(CategoryBudget {
                    category: allocation.category.clone(),
                    evaluation: Self::evaluate(allocation.allocated_amount, spent)?,
                })
            })
            .collect::<Result<Vec<_>, BudgetError>>()?;

        let unbudgeted_spent = checked_sum(
            spent_by_category
                .iter()
                .filter(|(category, _)| !allocations.iter().any(|a| &a.category == *category))
                .map(|(_, spent)| *spent),
        )
        .ok_or(BudgetError::AmountOutOfRange(Decimal::MAX))?;

        let total_allocated = checked_sum(categories.iter().map(|c| c.evaluation.allocated_amount))
            .ok_or(BudgetError::AmountOutOfRange(Decimal::MAX))?;
        let total_spent = checked_sum(categories.iter().map(|c| c.evaluation.spent_amount))
            .ok_or(BudgetError::AmountOutOfRange(Decimal::MAX))?;
        let overall = Self::evaluate(total_allocated, total_spent)?;

        let count = |status: BudgetStatus| {
            categories
                .iter()
                .filter(|c| c.evaluation.status == status)
                .count()
        };

        let summary = BudgetReportSummary {
            total_allocated: overall.allocated_amount,
            total_spent: overall.spent_amount,
            total_remaining: overall.remaining_amount,
            unbudgeted_spent: round_money(unbudgeted_spent),
            overall_utilization: overall.utilization_percentage,
            under_count: count(BudgetStatus::Under),
            on_track_count: count(BudgetStatus::OnTrack),
            over_count: count(BudgetStatus::Over),
        };

        debug!(
            categories = categories.len(),
            over = summary.over_count,
            utilization = %summary.overall_utilization,
            "Budget report built"
        );

        Ok(BudgetReport {
            categories,
            summary,
        })
    }

    /// Share of total spend per category, largest first.
    ///
    /// Ties are ordered by category name. With no spend at all every share is 0.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::AmountOutOfRange` if total spend overflows.
    pub fn spending_shares(
        spent_by_category: &BTreeMap<String, Decimal>,
    ) -> Result<Vec<SpendingShare>, BudgetError> {
        let total = checked_sum(spent_by_category.values().copied())
            .ok_or(BudgetError::AmountOutOfRange(Decimal::MAX))?;

        let mut shares = spent_by_category
            .iter()
            .map(|(category, amount)| {
                let percentage = if total.is_zero() {
                    Decimal::ZERO
                } else {
                    amount
                        .checked_div(total)
                        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                        .ok_or(BudgetError::AmountOutOfRange(*amount))?
                };
                Ok(SpendingShare {
                    category: category.clone(),
                    amount: round_money(*amount),
                    percentage: round_money(percentage),
                })
            })
            .collect::<Result<Vec<_>, BudgetError>>()?;

        shares.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
        Ok(shares)
    }
}
