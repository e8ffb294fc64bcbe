//! Run configuration loading.
//!
//! One TOML document carries both sections:
//!
//! ```toml
//! [scoring]
//! gold_tokens = ["ESTELITA"]
//! negative_title_triggers = ["TEMA"]
//! min_title_len_for_bronze = 8
//! owned_exceptions = []
//! stopwords = ["THE", "AND"]
//!
//! [aggregation]
//! silver_limit = 300
//! ```

use crate::cli::CliFormat;
use crate::error::{CliError, Result};
use cuecheck_aggregator::AggregatorConfig;
use cuecheck_scorer::{ConfigError, ScoringConfig};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// Configuration for one cuecheck run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Scoring rules (`[scoring]`, required)
    pub scoring: ScoringConfig,

    /// Aggregation settings (`[aggregation]`, optional)
    pub aggregation: AggregatorConfig,
}

impl RunConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        debug!("Loaded configuration from {}", path.display());
        Self::parse(&contents)
    }

    /// Parse and validate a configuration document.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut document: toml::Table = contents.parse()?;

        let scoring = match document.remove("scoring") {
            Some(toml::Value::Table(table)) => ScoringConfig::from_table(table)?,
            Some(_) => {
                return Err(ConfigError::Parse("[scoring] must be a table".to_string()).into());
            }
            None => return Err(ConfigError::MissingKey("scoring".to_string()).into()),
        };

        let aggregation = take_aggregation(&mut document)?;

        Ok(Self {
            scoring,
            aggregation,
        })
    }

    /// Load only the aggregation section, defaulting when absent.
    pub fn load_aggregation(path: &Path) -> Result<AggregatorConfig> {
        let contents = fs::read_to_string(path)?;
        let mut document: toml::Table = contents.parse()?;
        take_aggregation(&mut document)
    }
}

fn take_aggregation(document: &mut toml::Table) -> Result<AggregatorConfig> {
    let Some(value) = document.remove("aggregation") else {
        return Ok(AggregatorConfig::default());
    };
    let config: AggregatorConfig = value
        .try_into()
        .map_err(|e: toml::de::Error| CliError::Aggregation(e.to_string()))?;
    config.validate().map_err(CliError::Aggregation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCORING: &str = r#"
[scoring]
gold_tokens = ["ESTELITA"]
negative_title_triggers = ["TEMA"]
min_title_len_for_bronze = 8
owned_exceptions = []
stopwords = ["THE"]
"#;

    #[test]
    fn test_aggregation_defaults_when_absent() {
        let config = RunConfig::parse(SCORING).unwrap();
        assert_eq!(config.aggregation, AggregatorConfig::default());
        assert_eq!(config.scoring.min_title_len_for_bronze, 8);
    }

    #[test]
    fn test_aggregation_section() {
        let doc = format!("{SCORING}\n[aggregation]\nsilver_limit = 25\n");
        let config = RunConfig::parse(&doc).unwrap();
        assert_eq!(config.aggregation.silver_limit, 25);
        assert_eq!(config.aggregation.dedup_min_occurrences, 2);
    }

    #[test]
    fn test_missing_scoring_section() {
        let result = RunConfig::parse("[aggregation]\nsilver_limit = 1\n");
        assert!(matches!(
            result,
            Err(CliError::Config(ConfigError::MissingKey(key))) if key == "scoring"
        ));
    }

    #[test]
    fn test_missing_scoring_key_is_fatal() {
        let doc = SCORING.replace("stopwords = [\"THE\"]\n", "");
        assert!(matches!(
            RunConfig::parse(&doc),
            Err(CliError::Config(ConfigError::MissingKey(key))) if key == "stopwords"
        ));
    }

    #[test]
    fn test_invalid_aggregation() {
        let doc = format!("{SCORING}\n[aggregation]\ndedup_min_occurrences = 0\n");
        assert!(matches!(RunConfig::parse(&doc), Err(CliError::Aggregation(_))));
    }
}
