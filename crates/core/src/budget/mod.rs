//! Budget auto-allocation, evaluation and spend reporting.

pub mod allocator;
pub mod error;
pub mod period;
pub mod report;
pub mod types;
pub mod weights;


pub use allocator::BudgetAllocator;
pub use error::BudgetError;
pub use period::BudgetPeriod;
pub use types::{
    AllocationPlan, BudgetEvaluation, BudgetReport, BudgetReportSummary, BudgetStatus,
    CategoryAllocation, CategoryBudget, ON_TRACK_THRESHOLD, OVER_THRESHOLD, SpendingShare,
};
pub use weights::CategoryWeights;
