//! Turkish VAT (KDV) calculations.
//!
//! Converts between VAT-inclusive totals, tax amounts and net amounts for the
//! three valid KDV rates, suggests a rate from free text and aggregates
//! mixed-rate receipts. Decimal arithmetic only, rounded half-up to cents.

pub mod calculator;
pub mod error;
pub mod keywords;
pub mod mixed;
pub mod rate;

#[cfg(test)]
mod props;

pub use calculator::{KdvBreakdown, KdvCalculator};
pub use error::KdvError;
pub use keywords::RateKeywords;
pub use mixed::{KdvItem, MixedKdvSummary, RateSubtotal};
pub use rate::{KdvRate, validate_rate};
