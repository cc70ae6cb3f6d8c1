//! KDV error types.

use ecotrack_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use super::rate::KdvRate;

/// KDV-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KdvError {
    /// Rate is not one of the legally valid KDV rates.
    #[error("Invalid KDV rate: {rate}% (valid rates: {valid:?})")]
    InvalidRate {
        /// The rejected rate in percent.
        rate: Decimal,
        /// The valid rates in percent.
        valid: [Decimal; 3],
    },

    /// Amount is too large for the KDV arithmetic to represent.
    #[error("Amount out of range for KDV calculation: {0}")]
    AmountOutOfRange(Decimal),
}

impl KdvError {
    /// Builds an `InvalidRate` error for `rate`.
    #[must_use]
    pub fn invalid_rate(rate: Decimal) -> Self {
        Self::InvalidRate {
            rate,
            valid: KdvRate::ALL.map(KdvRate::percent),
        }
    }
}

impl From<KdvError> for AppError {
    fn from(err: KdvError) -> Self {
        Self::Validation(err.to_string())
    }
}
