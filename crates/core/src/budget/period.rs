//! Budget period kinds.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::BudgetError;

/// Length of a budget period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    /// Seven days.
    Weekly,
    /// One calendar month.
    #[default]
    Monthly,
    /// Three calendar months.
    Quarterly,
    /// Twelve calendar months.
    Yearly,
}

impl BudgetPeriod {
    /// Inclusive last day of a period starting on `start`.
    ///
    /// Month-based periods end the day before the same day-of-month comes
    /// around again, clamped at month ends (a monthly period starting
    /// January 31 ends February 27 or 28).
    pub fn end_date(self, start: NaiveDate) -> Result<NaiveDate, BudgetError> {
        let next_start = match self {
            Self::Weekly => start.checked_add_days(Days::new(7)),
            Self::Monthly => start.checked_add_months(Months::new(1)),
            Self::Quarterly => start.checked_add_months(Months::new(3)),
            Self::Yearly => start.checked_add_months(Months::new(12)),
        };

        next_start
            .and_then(|next| next.pred_opt())
            .ok_or(BudgetError::PeriodOutOfRange(start))
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Quarterly => write!(f, "quarterly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "quarterly" | "quarter" => Ok(Self::Quarterly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            _ => Err(BudgetError::InvalidPeriod(s.to_string())),
        }
    }
}
