//! Category weight tables for auto-allocation.

use std::collections::HashSet;

use ecotrack_shared::config::BudgetConfig;
use rust_decimal::Decimal;

use super::error::BudgetError;

/// Built-in EcoTrack split, in allocation order.
const DEFAULT_WEIGHTS: &[(&str, i64)] = &[
    ("housing", 30),
    ("groceries", 25),
    ("transportation", 10),
    ("utilities", 10),
    ("dining", 8),
    ("health", 5),
    ("entertainment", 5),
    ("shopping", 5),
    ("other", 2),
];

/// Ordered category → percentage table summing to exactly 100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWeights {
    entries: Vec<(String, Decimal)>,
}

impl CategoryWeights {
    /// Validates and builds a weight table.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidWeights` for an empty table, a duplicate
    /// category, a weight outside 0-100, or weights not summing to 100.
    pub fn new(entries: Vec<(String, Decimal)>) -> Result<Self, BudgetError> {
        if entries.is_empty() {
            return Err(BudgetError::InvalidWeights("no categories".to_string()));
        }

        let mut seen = HashSet::new();
        for (category, weight) in &entries {
            if !seen.insert(category.as_str()) {
                return Err(BudgetError::InvalidWeights(format!(
                    "duplicate category {category}"
                )));
            }
            if *weight < Decimal::ZERO || *weight > Decimal::ONE_HUNDRED {
                return Err(BudgetError::InvalidWeights(format!(
                    "weight for {category} must be between 0 and 100, got {weight}"
                )));
            }
        }

        let sum: Decimal = entries.iter().map(|(_, w)| *w).sum();
        if sum != Decimal::ONE_HUNDRED {
            return Err(BudgetError::InvalidWeights(format!(
                "weights sum to {sum}, expected 100"
            )));
        }

        Ok(Self { entries })
    }

    /// Builds the table from configuration, falling back to the built-in one.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidWeights` if the configured table is invalid.
    pub fn from_config(config: &BudgetConfig) -> Result<Self, BudgetError> {
        if config.category_weights.is_empty() {
            return Ok(Self::default());
        }

        Self::new(
            config
                .category_weights
                .iter()
                .map(|entry| (entry.category.clone(), entry.weight))
                .collect(),
        )
    }

    /// Entries in allocation order.
    #[must_use]
    pub fn entries(&self) -> &[(String, Decimal)] {
        &self.entries
    }

    /// Default weight for `category`, if present.
    #[must_use]
    pub fn weight(&self, category: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, weight)| *weight)
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            entries: DEFAULT_WEIGHTS
                .iter()
                .map(|(category, weight)| ((*category).to_string(), Decimal::from(*weight)))
                .collect(),
        }
    }
}
