//! Budget auto-allocation and evaluation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ecotrack_shared::types::{BudgetId, UserId, checked_sum, round_money};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::BudgetError;
use super::period::BudgetPeriod;
use super::types::{AllocationPlan, BudgetEvaluation, BudgetStatus, CategoryAllocation};
use super::weights::CategoryWeights;

/// Budget allocator.
pub struct BudgetAllocator;

impl BudgetAllocator {
    /// Splits `total` across the categories of `weights`.
    ///
    /// Overrides replace the default weight of the categories they name; the
    /// percentage they leave over is shared by the other categories in
    /// proportion to their default weights. Amounts are rounded half-up to
    /// cents and the last category with a non-zero share absorbs the rounding
    /// remainder, so the allocations add up to `total` exactly.
    ///
    /// # Errors
    ///
    /// - `InvalidBudget` if `total` is not positive.
    /// - `UnknownCategory` / `InvalidOverride` for a bad override entry.
    /// - `InvalidWeights` if overrides exceed 100% or leave a remainder that
    ///   no category can take.
    /// - `AmountOutOfRange` if `total` is too large to split.
    pub fn auto_allocate(
        total: Decimal,
        weights: &CategoryWeights,
        overrides: Option<&BTreeMap<String, Decimal>>,
    ) -> Result<Vec<CategoryAllocation>, BudgetError> {
        let total_rounded = round_money(total);
        if total_rounded <= Decimal::ZERO {
            return Err(BudgetError::InvalidBudget(total));
        }

        let shares = effective_shares(weights, overrides)?;

        let out_of_range = || BudgetError::AmountOutOfRange(total);
        let mut allocations = shares
            .iter()
            .map(|(category, share)| {
                let amount = total_rounded
                    .checked_mul(*share)
                    .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
                    .ok_or_else(out_of_range)?;
                Ok(CategoryAllocation {
                    category: category.clone(),
                    allocated_amount: round_money(amount),
                    percentage: round_money(*share),
                })
            })
            .collect::<Result<Vec<_>, BudgetError>>()?;

        let allocated = checked_sum(allocations.iter().map(|a| a.allocated_amount))
            .ok_or_else(out_of_range)?;
        let remainder = total_rounded - allocated;
        absorb_remainder(&mut allocations, &shares, remainder);

        debug!(
            total = %total_rounded,
            categories = allocations.len(),
            overridden = overrides.map_or(0, BTreeMap::len),
            %remainder,
            "Budget auto-allocated"
        );

        Ok(allocations)
    }

    /// Evaluates spend against an allocation.
    ///
    /// Utilization of a zero allocation is 0 rather than a division error.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::AmountOutOfRange` if the remaining amount or the
    /// utilization overflows.
    pub fn evaluate(allocated: Decimal, spent: Decimal) -> Result<BudgetEvaluation, BudgetError> {
        let out_of_range = || BudgetError::AmountOutOfRange(spent);
        let utilization = if allocated.is_zero() {
            round_money(Decimal::ZERO)
        } else {
            spent
                .checked_div(allocated)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(round_money)
                .ok_or_else(out_of_range)?
        };
        let remaining = allocated.checked_sub(spent).ok_or_else(out_of_range)?;

        Ok(BudgetEvaluation {
            allocated_amount: round_money(allocated),
            spent_amount: round_money(spent),
            remaining_amount: round_money(remaining),
            utilization_percentage: utilization,
            status: BudgetStatus::from_utilization(utilization),
        })
    }

    /// Builds the allocation plan for one period.
    ///
    /// The plan is returned to the caller for persistence; nothing is stored
    /// here.
    ///
    /// # Errors
    ///
    /// Returns the `auto_allocate` errors, or `BudgetError::PeriodOutOfRange`
    /// when the period end cannot be represented.
    pub fn apply_allocation(
        user_id: UserId,
        total_budget: Decimal,
        period: BudgetPeriod,
        period_start: NaiveDate,
        weights: &CategoryWeights,
        overrides: Option<&BTreeMap<String, Decimal>>,
    ) -> Result<AllocationPlan, BudgetError> {
        let allocations = Self::auto_allocate(total_budget, weights, overrides)?;
        let period_end = period.end_date(period_start)?;

        let plan = AllocationPlan {
            id: BudgetId::new(),
            user_id,
            total_budget: round_money(total_budget),
            period,
            period_start,
            period_end,
            allocations,
        };

        debug!(
            budget_id = %plan.id,
            user_id = %user_id,
            %period,
            %period_start,
            %period_end,
            "Allocation plan built"
        );

        Ok(plan)
    }
}

/// Folds the rounding remainder back into the allocations.
///
/// A positive remainder goes to the last category with a non-zero share. A
/// negative one is taken from those categories walking backwards, never
/// pushing an amount below zero.
fn absorb_remainder(
    allocations: &mut [CategoryAllocation],
    shares: &[(String, Decimal)],
    remainder: Decimal,
) {
    let mut remainder = remainder;
    let absorbers = shares
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, (_, share))| !share.is_zero())
        .map(|(index, _)| index);

    for index in absorbers {
        if remainder.is_zero() {
            break;
        }
        let amount = &mut allocations[index].allocated_amount;
        let delta = if remainder > Decimal::ZERO {
            remainder
        } else {
            remainder.max(-*amount)
        };
        *amount += delta;
        remainder -= delta;
    }
}

/// Effective percentage per category after applying overrides.
fn effective_shares(
    weights: &CategoryWeights,
    overrides: Option<&BTreeMap<String, Decimal>>,
) -> Result<Vec<(String, Decimal)>, BudgetError> {
    let Some(overrides) = overrides.filter(|o| !o.is_empty()) else {
        return Ok(weights.entries().to_vec());
    };

    for (category, weight) in overrides {
        if weights.weight(category).is_none() {
            return Err(BudgetError::UnknownCategory(category.clone()));
        }
        if *weight < Decimal::ZERO || *weight > Decimal::ONE_HUNDRED {
            return Err(BudgetError::InvalidOverride {
                category: category.clone(),
                weight: *weight,
            });
        }
    }

    let overridden: Decimal = overrides.values().copied().sum();
    if overridden > Decimal::ONE_HUNDRED {
        return Err(BudgetError::InvalidWeights(format!(
            "overrides sum to {overridden}, above 100"
        )));
    }

    let left_over = Decimal::ONE_HUNDRED - overridden;
    let free_weight: Decimal = weights
        .entries()
        .iter()
        .filter(|(category, _)| !overrides.contains_key(category))
        .map(|(_, weight)| *weight)
        .sum();

    if free_weight.is_zero() && !left_over.is_zero() {
        return Err(BudgetError::InvalidWeights(format!(
            "{left_over} left over after overrides but no category can absorb it"
        )));
    }

    Ok(weights
        .entries()
        .iter()
        .map(|(category, weight)| {
            let share = match overrides.get(category) {
                Some(fixed) => *fixed,
                None if free_weight.is_zero() => Decimal::ZERO,
                None => left_over * *weight / free_weight,
            };
            (category.clone(), share)
        })
        .collect())
}
