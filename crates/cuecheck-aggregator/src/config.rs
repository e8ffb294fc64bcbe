//! Configuration for aggregation
//!
//! Controls the size of the action sheet and which duplicate groups are
//! listed.

use serde::{Deserialize, Serialize};

/// Configuration for the aggregator
///
/// # Examples
///
/// ```
/// use cuecheck_aggregator::AggregatorConfig;
///
/// // Default configuration (review batch sized for one analyst day)
/// let config = AggregatorConfig::default();
/// assert_eq!(config.silver_limit, 300);
///
/// // Strict: smaller review batch
/// let config = AggregatorConfig::strict();
/// assert_eq!(config.silver_limit, 100);
///
/// // Lenient: larger batch, every group listed
/// let config = AggregatorConfig::lenient();
/// assert_eq!(config.dedup_min_occurrences, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Silver records kept on the action sheet after ranking
    /// Default: 300
    pub silver_limit: usize,

    /// Smallest duplicate group listed in the dedup table
    /// Default: 2 (only actual repeats)
    pub dedup_min_occurrences: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            silver_limit: 300,
            dedup_min_occurrences: 2,
        }
    }
}

impl AggregatorConfig {
    /// Strict preset: short review list
    pub fn strict() -> Self {
        Self {
            silver_limit: 100,
            dedup_min_occurrences: 2,
        }
    }

    /// Lenient preset: long review list, singleton groups listed
    pub fn lenient() -> Self {
        Self {
            silver_limit: 1_000,
            dedup_min_occurrences: 1,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.dedup_min_occurrences == 0 {
            return Err("dedup_min_occurrences must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
