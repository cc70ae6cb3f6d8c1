//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// KDV calculator configuration.
    pub kdv: KdvConfig,
    /// Budget allocator configuration.
    pub budget: BudgetConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ecotrack=info".to_string(),
            json: false,
        }
    }
}

/// KDV calculator configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KdvConfig {
    /// Rate returned by keyword suggestion when nothing matches.
    pub default_rate: Decimal,
    /// Ordered keyword buckets. Empty means the built-in table.
    pub keywords: Vec<RateKeywordsConfig>,
}

impl Default for KdvConfig {
    fn default() -> Self {
        Self {
            default_rate: Decimal::from(20),
            keywords: Vec::new(),
        }
    }
}

/// One keyword bucket of the KDV suggestion table.
#[derive(Debug, Clone, Deserialize)]
pub struct RateKeywordsConfig {
    /// KDV rate in percent.
    pub rate: Decimal,
    /// Keywords matched case-insensitively as substrings.
    pub keywords: Vec<String>,
}

/// Budget allocator configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Period used when a caller does not name one.
    pub default_period: String,
    /// Ordered category weights. Empty means the built-in table.
    pub category_weights: Vec<CategoryWeightConfig>,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            default_period: "monthly".to_string(),
            category_weights: Vec::new(),
        }
    }
}

/// A single category weight entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryWeightConfig {
    /// Category name.
    pub category: String,
    /// Share of the total budget in percent.
    pub weight: Decimal,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `ECOTRACK__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ECOTRACK").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed.
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
