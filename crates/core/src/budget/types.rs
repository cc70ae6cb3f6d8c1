//! Budget data types.

use chrono::NaiveDate;
use ecotrack_shared::types::{BudgetId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::BudgetPeriod;

/// Utilization at or above which a category is on track.
pub const ON_TRACK_THRESHOLD: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Utilization above which a category is over budget.
pub const OVER_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// Spending status of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Utilization below 80%.
    Under,
    /// Utilization between 80% and 100% inclusive.
    OnTrack,
    /// Utilization above 100%.
    Over,
}

impl BudgetStatus {
    /// Classifies a utilization percentage.
    #[must_use]
    pub fn from_utilization(utilization: Decimal) -> Self {
        if utilization > OVER_THRESHOLD {
            Self::Over
        } else if utilization >= ON_TRACK_THRESHOLD {
            Self::OnTrack
        } else {
            Self::Under
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Under => write!(f, "under"),
            Self::OnTrack => write!(f, "on_track"),
            Self::Over => write!(f, "over"),
        }
    }
}

/// Amount assigned to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    /// Category name.
    pub category: String,
    /// Allocated amount.
    pub allocated_amount: Decimal,
    /// Effective share of the total in percent.
    pub percentage: Decimal,
}

/// Allocated vs spent evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEvaluation {
    /// Allocated amount.
    pub allocated_amount: Decimal,
    /// Spent amount, supplied by the reporting layer.
    pub spent_amount: Decimal,
    /// Allocated minus spent; negative when overspent.
    pub remaining_amount: Decimal,
    /// Spent / allocated * 100, or 0 for a zero allocation.
    pub utilization_percentage: Decimal,
    /// Status derived from utilization.
    pub status: BudgetStatus,
}

/// Evaluation of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudget {
    /// Category name.
    pub category: String,
    /// Figures for the category.
    #[serde(flatten)]
    pub evaluation: BudgetEvaluation,
}

/// Allocation for a budget period, handed to the store for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Plan ID.
    pub id: BudgetId,
    /// Owner.
    pub user_id: UserId,
    /// Total budget.
    pub total_budget: Decimal,
    /// Period kind.
    pub period: BudgetPeriod,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period, inclusive.
    pub period_end: NaiveDate,
    /// Per-category allocations.
    pub allocations: Vec<CategoryAllocation>,
}

/// Evaluated categories plus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetReport {
    /// One entry per allocation, in allocation order.
    pub categories: Vec<CategoryBudget>,
    /// Totals.
    pub summary: BudgetReportSummary,
}

/// Report totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetReportSummary {
    /// Sum of allocations.
    pub total_allocated: Decimal,
    /// Spend in allocated categories.
    pub total_spent: Decimal,
    /// Allocated minus spent.
    pub total_remaining: Decimal,
    /// Spend in categories without an allocation.
    pub unbudgeted_spent: Decimal,
    /// Overall utilization percentage.
    pub overall_utilization: Decimal,
    /// Categories under budget.
    pub under_count: usize,
    /// Categories on track.
    pub on_track_count: usize,
    /// Categories over budget.
    pub over_count: usize,
}

/// A category's share of total spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingShare {
    /// Category name.
    pub category: String,
    /// Amount spent.
    pub amount: Decimal,
    /// Share of total spend in percent.
    pub percentage: Decimal,
}
