//! Category/description keyword table for KDV rate suggestion.

use ecotrack_shared::config::KdvConfig;

use super::error::KdvError;
use super::rate::KdvRate;

/// 1%: staple foods, health, education.
const REDUCED_KEYWORDS: &[&str] = &[
    "ekmek", "bread", "süt", "milk", "peynir", "cheese", "yumurta", "egg", "sebze",
    "vegetable", "meyve", "fruit", "bakliyat", "legume", "makarna", "pasta", "gıda",
    "grocery", "groceries", "ilaç", "medicine", "eczane", "pharmacy", "kitap", "textbook",
    "gazete", "newspaper", "okul", "school", "eğitim", "education", "kırtasiye",
];

/// 10%: housing, culture, tourism, food service.
const INTERMEDIATE_KEYWORDS: &[&str] = &[
    "otel", "hotel", "pansiyon", "hostel", "konaklama", "accommodation", "restoran",
    "restaurant", "lokanta", "kafe", "cafe", "yemek", "meal", "tatil", "holiday", "turizm",
    "tourism", "sinema", "cinema", "tiyatro", "theatre", "theater", "konser", "concert",
    "müze", "museum", "konut", "housing", "kira", "rental",
];

/// 20%: general rate. Listed for completeness; unmatched text lands here anyway.
const STANDARD_KEYWORDS: &[&str] = &[
    "elektronik", "electronics", "laptop", "bilgisayar", "computer", "telefon", "phone",
    "giyim", "clothing", "akaryakıt", "benzin", "fuel", "alkol", "alcohol", "sigara",
    "tobacco", "mobilya", "furniture", "kozmetik", "cosmetics",
];

/// Ordered rate buckets used to guess a KDV rate from free text.
///
/// Buckets are always checked from the lowest rate to the highest and the
/// first bucket with any matching keyword wins, regardless of how long or
/// specific the match is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateKeywords {
    buckets: Vec<(KdvRate, Vec<String>)>,
    default_rate: KdvRate,
}

impl RateKeywords {
    /// Creates a table from `(rate, keywords)` buckets.
    ///
    /// Keywords are lowercased and blank ones dropped. Buckets are put in
    /// ascending rate order; buckets sharing a rate keep their given order.
    #[must_use]
    pub fn new(buckets: Vec<(KdvRate, Vec<String>)>, default_rate: KdvRate) -> Self {
        let mut buckets: Vec<(KdvRate, Vec<String>)> = buckets
            .into_iter()
            .map(|(rate, keywords)| {
                let keywords = keywords
                    .iter()
                    .map(|k| normalize(k.trim()))
                    .filter(|k| !k.is_empty())
                    .collect();
                (rate, keywords)
            })
            .collect();
        buckets.sort_by_key(|(rate, _)| *rate);

        Self {
            buckets,
            default_rate,
        }
    }

    /// Builds the table from configuration.
    ///
    /// An empty configured keyword list keeps the built-in buckets but still
    /// honours the configured default rate.
    pub fn from_config(config: &KdvConfig) -> Result<Self, KdvError> {
        let default_rate = KdvRate::try_from(config.default_rate)?;

        if config.keywords.is_empty() {
            return Ok(Self {
                default_rate,
                ..Self::default()
            });
        }

        let buckets = config
            .keywords
            .iter()
            .map(|bucket| Ok((KdvRate::try_from(bucket.rate)?, bucket.keywords.clone())))
            .collect::<Result<Vec<_>, KdvError>>()?;

        Ok(Self::new(buckets, default_rate))
    }

    /// Rate returned when no keyword matches.
    #[must_use]
    pub fn default_rate(&self) -> KdvRate {
        self.default_rate
    }

    /// The buckets in matching order.
    #[must_use]
    pub fn buckets(&self) -> &[(KdvRate, Vec<String>)] {
        &self.buckets
    }

    /// Suggests a rate for a category name or receipt line description.
    #[must_use]
    pub fn suggest(&self, text: &str) -> KdvRate {
        let haystack = normalize(text);

        self.buckets
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k.as_str())))
            .map_or(self.default_rate, |(rate, _)| *rate)
    }
}

impl Default for RateKeywords {
    fn default() -> Self {
        let bucket = |rate: KdvRate, words: &[&str]| {
            (rate, words.iter().map(ToString::to_string).collect())
        };

        Self::new(
            vec![
                bucket(KdvRate::Reduced, REDUCED_KEYWORDS),
                bucket(KdvRate::Intermediate, INTERMEDIATE_KEYWORDS),
                bucket(KdvRate::Standard, STANDARD_KEYWORDS),
            ],
            KdvRate::Standard,
        )
    }
}

/// Lowercases text and folds Turkish `İ`/`ı` into a plain `i`.
///
/// `I` lowercases to `i` rather than `ı`, so both spellings have to meet
/// on the dotted form for upper-case Turkish text to match.
fn normalize(text: &str) -> String {
    text.replace('İ', "i").to_lowercase().replace('ı', "i")
}
