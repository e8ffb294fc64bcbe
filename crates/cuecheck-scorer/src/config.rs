//! Scoring configuration
//!
//! The token lists drive Gold and hard-deny decisions, so the five core keys
//! are required: a missing list must fail loudly instead of defaulting to
//! empty and silently changing the billing outcome.

use crate::ConfigError;
use cuecheck_domain::normalize::{DEFAULT_MIN_TOKEN_LEN, DEFAULT_PRESERVED};
use serde::{Deserialize, Serialize};

/// Keys that must be present in a scoring configuration document
pub const REQUIRED_KEYS: [&str; 5] = [
    "gold_tokens",
    "negative_title_triggers",
    "min_title_len_for_bronze",
    "owned_exceptions",
    "stopwords",
];

/// A negative title trigger
///
/// A bare string matches the whole normalized title; the table form with
/// `substring = true` matches anywhere inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleTrigger {
    /// Whole-title match
    Exact(String),
    /// Explicit form
    Pattern {
        /// Trigger text
        text: String,
        /// Match anywhere in the title
        #[serde(default)]
        substring: bool,
    },
}

impl TitleTrigger {
    /// Trigger text, unnormalized
    pub fn text(&self) -> &str {
        match self {
            TitleTrigger::Exact(text) => text,
            TitleTrigger::Pattern { text, .. } => text,
        }
    }

    /// Whether the trigger matches inside titles
    pub fn is_substring(&self) -> bool {
        matches!(self, TitleTrigger::Pattern { substring: true, .. })
    }
}

/// A title known to be owned despite carrying a deny or negative cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedException {
    /// Title the exception applies to
    pub title: String,
    /// Ownership token that must appear in the row text
    pub token: String,
}

/// Configuration for the scoring engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Ownership markers; a hit contributes GOLD_TOKEN_HIT
    pub gold_tokens: Vec<String>,

    /// Titles too generic to match on title alone
    pub negative_title_triggers: Vec<TitleTrigger>,

    /// Minimum normalized title length (characters) for Bronze
    pub min_title_len_for_bronze: usize,

    /// Owned titles that override deny and negative cues
    pub owned_exceptions: Vec<OwnedException>,

    /// Words ignored when comparing artist/author tokens
    pub stopwords: Vec<String>,

    /// Third-party markers that hard-deny a row unless identifier or gold evidence exists
    #[serde(default)]
    pub deny_tokens: Vec<String>,

    /// ASCII punctuation kept by normalization
    #[serde(default = "default_preserved_punctuation")]
    pub preserved_punctuation: Vec<char>,

    /// Shortest artist/author token considered for overlap
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
}

fn default_preserved_punctuation() -> Vec<char> {
    DEFAULT_PRESERVED.to_vec()
}

fn default_min_token_len() -> usize {
    DEFAULT_MIN_TOKEN_LEN
}

impl ScoringConfig {
    /// Empty rule set with the given Bronze threshold
    pub fn new(min_title_len_for_bronze: usize) -> Self {
        Self {
            gold_tokens: Vec::new(),
            negative_title_triggers: Vec::new(),
            min_title_len_for_bronze,
            owned_exceptions: Vec::new(),
            stopwords: Vec::new(),
            deny_tokens: Vec::new(),
            preserved_punctuation: default_preserved_punctuation(),
            min_token_len: default_min_token_len(),
        }
    }

    /// Add gold tokens
    pub fn with_gold_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gold_tokens.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Add a whole-title negative trigger
    pub fn with_negative_trigger(mut self, title: impl Into<String>) -> Self {
        self.negative_title_triggers.push(TitleTrigger::Exact(title.into()));
        self
    }

    /// Add a substring negative trigger
    pub fn with_substring_trigger(mut self, text: impl Into<String>) -> Self {
        self.negative_title_triggers.push(TitleTrigger::Pattern {
            text: text.into(),
            substring: true,
        });
        self
    }

    /// Add an owned exception
    pub fn with_owned_exception(mut self, title: impl Into<String>, token: impl Into<String>) -> Self {
        self.owned_exceptions.push(OwnedException {
            title: title.into(),
            token: token.into(),
        });
        self
    }

    /// Add stopwords
    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords.extend(stopwords.into_iter().map(Into::into));
        self
    }

    /// Add deny tokens
    pub fn with_deny_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny_tokens.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Validate the configuration
    ///
    /// Token normalization checks happen in [`crate::ScoringRules::compile`],
    /// which needs the normalizer this configuration describes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_title_len_for_bronze == 0 {
            return Err(ConfigError::invalid(
                "min_title_len_for_bronze",
                "must be greater than 0",
            ));
        }
        if self.min_token_len == 0 {
            return Err(ConfigError::invalid("min_token_len", "must be greater than 0"));
        }
        for &c in &self.preserved_punctuation {
            if !c.is_ascii_punctuation() || c == '\'' {
                return Err(ConfigError::invalid(
                    "preserved_punctuation",
                    format!("{c:?} is not preservable punctuation"),
                ));
            }
        }
        Ok(())
    }

    /// Load configuration from a TOML document whose root is the scoring table
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = toml_str
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::Parse(format!("Failed to parse TOML: {e}")))?;
        Self::from_table(table)
    }

    /// Load configuration from an already-parsed TOML table
    pub fn from_table(table: toml::Table) -> Result<Self, ConfigError> {
        if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !table.contains_key(**key)) {
            return Err(ConfigError::MissingKey((*missing).to_string()));
        }
        let config: Self = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}
