//! Error types for the CLI application.

use cuecheck_domain::RecordError;
use cuecheck_index::IndexError;
use cuecheck_scorer::ConfigError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Scoring configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Aggregation configuration error
    #[error("Aggregation config error: {0}")]
    Aggregation(String),

    /// Reference catalog refused in strict mode
    #[error("Reference catalog error: {0}")]
    Index(#[from] IndexError),

    /// Evidence record could not be read back
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The same record appears twice in the aggregated input
    #[error("Duplicate record: ordinal {ordinal} from {source_ref:?}")]
    DuplicateRecord {
        /// Repeated ordinal
        ordinal: usize,
        /// Its provenance
        source_ref: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
