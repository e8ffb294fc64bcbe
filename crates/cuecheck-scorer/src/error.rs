//! Scorer error types

use thiserror::Error;

/// Startup-time configuration failures
///
/// Scoring correctness depends on every configured list, so none of these is
/// recoverable: the run must not start.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required key is absent
    #[error("Configuration error: missing required key `{0}`")]
    MissingKey(String),

    /// The document could not be parsed or has the wrong shape
    #[error("Configuration error: {0}")]
    Parse(String),

    /// A key is present but its value is unusable
    #[error("Configuration error: invalid `{key}`: {reason}")]
    Invalid {
        /// Offending key
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// Serialization failure
    #[error("Configuration error: failed to serialize: {0}")]
    Serialize(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
