//! Compiled scoring rules
//!
//! Every configured token is normalized once here, with the same
//! [`Normalizer`] later used for the catalog and the rows.

use crate::{ConfigError, ScoringConfig};
use cuecheck_domain::Normalizer;
use std::collections::BTreeSet;

/// An owned exception in comparison form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledException {
    /// Normalized title the exception applies to
    pub title_norm: String,
    /// Words of the ownership token, all required in the row text
    pub token_words: Vec<String>,
}

/// Immutable, normalized rule set for one run
#[derive(Debug, Clone)]
pub struct ScoringRules {
    normalizer: Normalizer,
    gold_tokens: Vec<String>,
    exact_triggers: BTreeSet<String>,
    substring_triggers: Vec<String>,
    deny_tokens: Vec<Vec<String>>,
    owned_exceptions: Vec<CompiledException>,
    min_title_len_for_bronze: usize,
}

impl ScoringRules {
    /// Validate and normalize a configuration
    pub fn compile(config: &ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let normalizer = Normalizer::new(config.preserved_punctuation.iter().copied())
            .with_stopwords(&config.stopwords)
            .with_min_token_len(config.min_token_len);

        let gold_tokens = normalize_all(&normalizer, "gold_tokens", &config.gold_tokens)?;

        let mut exact_triggers = BTreeSet::new();
        let mut substring_triggers = Vec::new();
        for trigger in &config.negative_title_triggers {
            let text = normalize_one(&normalizer, "negative_title_triggers", trigger.text())?;
            if trigger.is_substring() {
                substring_triggers.push(text);
            } else {
                exact_triggers.insert(text);
            }
        }

        let deny_tokens = config
            .deny_tokens
            .iter()
            .map(|token| words_of(&normalizer, "deny_tokens", token))
            .collect::<Result<Vec<_>, _>>()?;

        let owned_exceptions = config
            .owned_exceptions
            .iter()
            .map(|exception| {
                Ok(CompiledException {
                    title_norm: normalize_one(&normalizer, "owned_exceptions", &exception.title)?,
                    token_words: words_of(&normalizer, "owned_exceptions", &exception.token)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            normalizer,
            gold_tokens,
            exact_triggers,
            substring_triggers,
            deny_tokens,
            owned_exceptions,
            min_title_len_for_bronze: config.min_title_len_for_bronze,
        })
    }

    /// Normalizer shared with the reference index
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Normalized gold tokens
    pub fn gold_tokens(&self) -> &[String] {
        &self.gold_tokens
    }

    /// Normalized deny tokens, split into words
    pub fn deny_tokens(&self) -> &[Vec<String>] {
        &self.deny_tokens
    }

    /// Normalized owned exceptions
    pub fn owned_exceptions(&self) -> &[CompiledException] {
        &self.owned_exceptions
    }

    /// Minimum normalized title length for Bronze
    pub fn min_title_len_for_bronze(&self) -> usize {
        self.min_title_len_for_bronze
    }

    /// Whether a normalized title trips a negative trigger
    pub fn is_negative_title(&self, title_norm: &str) -> bool {
        self.exact_triggers.contains(title_norm)
            || self
                .substring_triggers
                .iter()
                .any(|trigger| title_norm.contains(trigger.as_str()))
    }
}

fn normalize_one(normalizer: &Normalizer, key: &str, raw: &str) -> Result<String, ConfigError> {
    let normalized = normalizer.normalize(raw);
    if normalized.is_empty() {
        return Err(ConfigError::invalid(
            key,
            format!("{raw:?} normalizes to an empty string"),
        ));
    }
    Ok(normalized)
}

fn normalize_all(normalizer: &Normalizer, key: &str, raw: &[String]) -> Result<Vec<String>, ConfigError> {
    raw.iter().map(|r| normalize_one(normalizer, key, r)).collect()
}

fn words_of(normalizer: &Normalizer, key: &str, raw: &str) -> Result<Vec<String>, ConfigError> {
    let words = normalizer.words(raw);
    if words.is_empty() {
        return Err(ConfigError::invalid(
            key,
            format!("{raw:?} normalizes to an empty string"),
        ));
    }
    Ok(words)
}
