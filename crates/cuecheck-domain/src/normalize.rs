//! Text canonicalization shared by catalog indexing and row scoring
//!
//! `normalize` produces the comparison form of a title or name:
//!
//! 1. uppercase, then canonical decomposition with combining marks dropped
//!    (`Déjà vu` → `DEJA VU`)
//! 2. apostrophes removed (`DON'T` → `DONT`)
//! 3. every other non-alphanumeric character becomes a space, except the
//!    preserved punctuation (by default `&` and `-`)
//! 4. preserved punctuation survives only inside a word (`AC-DC`, `R&B`);
//!    at a word edge it is dropped (`ROCK & ROLL` → `ROCK ROLL`)
//! 5. whitespace collapsed to single spaces and trimmed
//!
//! The output is a fixed point: `normalize(normalize(x)) == normalize(x)`.

use std::collections::BTreeSet;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

const APOSTROPHES: [char; 5] = ['\'', '\u{2019}', '\u{2018}', '`', '\u{00B4}'];

/// Default punctuation kept inside words
pub const DEFAULT_PRESERVED: [char; 2] = ['&', '-'];

/// Default minimum token length for artist/author comparison
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Canonicalizes free text for comparison
///
/// One instance is built per run and shared by the index and the scorer, so
/// catalog titles and report titles go through identical rules.
///
/// # Examples
///
/// ```
/// use cuecheck_domain::Normalizer;
///
/// let n = Normalizer::default();
/// assert_eq!(n.normalize("  Déjà   vu! "), "DEJA VU");
/// assert_eq!(n.normalize("AC-DC"), "AC-DC");
/// assert_eq!(n.normalize("Rock & Roll"), "ROCK ROLL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    preserved: BTreeSet<char>,
    stopwords: BTreeSet<String>,
    min_token_len: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PRESERVED)
    }
}

impl Normalizer {
    /// Create a normalizer keeping the given punctuation inside words
    ///
    /// Apostrophes, whitespace and alphanumerics are ignored if passed here.
    pub fn new(preserved: impl IntoIterator<Item = char>) -> Self {
        let preserved = preserved
            .into_iter()
            .filter(|c| !c.is_alphanumeric() && !c.is_whitespace() && !APOSTROPHES.contains(c))
            .collect();
        Self {
            preserved,
            stopwords: BTreeSet::new(),
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }

    /// Set the stopwords removed by [`Normalizer::tokenize`]
    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = BTreeSet::new();
        for word in stopwords {
            for w in self.words(word.as_ref()) {
                normalized.insert(w);
            }
        }
        self.stopwords = normalized;
        self
    }

    /// Set the minimum token length kept by [`Normalizer::tokenize`]
    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len;
        self
    }

    /// Punctuation preserved inside words
    pub fn preserved(&self) -> impl Iterator<Item = char> + '_ {
        self.preserved.iter().copied()
    }

    /// Normalized stopwords
    pub fn stopwords(&self) -> &BTreeSet<String> {
        &self.stopwords
    }

    /// Canonical comparison form of `text`
    pub fn normalize(&self, text: &str) -> String {
        let mut mapped = String::with_capacity(text.len());
        for c in text.chars() {
            for upper in c.to_uppercase() {
                decompose_canonical(upper, |d| {
                    if is_combining_mark(d) || APOSTROPHES.contains(&d) {
                        return;
                    }
                    if d.is_alphanumeric() || self.preserved.contains(&d) {
                        mapped.push(d);
                    } else {
                        mapped.push(' ');
                    }
                });
            }
        }

        let mut out = String::with_capacity(mapped.len());
        for word in mapped.split_whitespace() {
            let word = word.trim_matches(|c: char| self.preserved.contains(&c));
            if word.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }

    /// Normalized words of `text`, split on whitespace and preserved punctuation
    ///
    /// No stopword or length filtering; used for exact token-boundary matching.
    pub fn words(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split(|c: char| c == ' ' || self.preserved.contains(&c))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Ordered comparison tokens of `text` with stopwords and short tokens removed
    ///
    /// Used for artist/author overlap.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.words(text)
            .into_iter()
            .filter(|w| w.chars().count() >= self.min_token_len)
            .filter(|w| !self.stopwords.contains(w))
            .collect()
    }
}
