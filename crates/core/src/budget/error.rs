//! Budget error types.

use ecotrack_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Total budget must be positive.
    #[error("Total budget must be positive, got {0}")]
    InvalidBudget(Decimal),

    /// Amount is too large for the budget arithmetic to represent.
    #[error("Amount out of range for budget calculation: {0}")]
    AmountOutOfRange(Decimal),

    /// Category weight table or override set is inconsistent.
    #[error("Invalid category weights: {0}")]
    InvalidWeights(String),

    /// Override weight outside 0-100.
    #[error("Override for {category} must be between 0 and 100, got {weight}")]
    InvalidOverride {
        /// Category name.
        category: String,
        /// Rejected weight.
        weight: Decimal,
    },

    /// Override names a category that is not in the weight table.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Unrecognized budget period name.
    #[error("Invalid budget period: {0}")]
    InvalidPeriod(String),

    /// Period end falls outside the supported date range.
    #[error("Budget period starting {0} ends outside the supported date range")]
    PeriodOutOfRange(chrono::NaiveDate),
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        Self::Validation(err.to_string())
    }
}
