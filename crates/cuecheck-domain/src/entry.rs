//! Reference catalog entries - the works and recordings the rights-holder owns

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a catalog entry
///
/// Ordering is numeric and is the final tie-break when several entries share
/// a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Create an id from its raw value
    pub fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// Raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the reference catalog snapshot
///
/// As read from the snapshot, `title_norm` is empty and the token sets hold
/// raw names. The index derives `title_norm`, canonicalizes identifiers and
/// replaces the token sets with their normalized forms; indexed entries are
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Catalog entry id
    pub id: EntryId,

    /// Display title (missing or blank titles make the entry invalid)
    #[serde(default, deserialize_with = "crate::row::null_as_empty")]
    pub title: String,

    /// Normalized title (derived at index build)
    #[serde(default)]
    pub title_norm: String,

    /// Recording identifier
    #[serde(default)]
    pub isrc: Option<String>,

    /// Composition identifier
    #[serde(default)]
    pub iswc: Option<String>,

    /// Contributor, publisher and owned-name tokens
    #[serde(default)]
    pub evidence_tokens: BTreeSet<String>,

    /// High-stakes tokens (a subset of the evidence tokens once indexed)
    #[serde(default)]
    pub gold_tokens: BTreeSet<String>,
}

impl ReferenceEntry {
    /// Create an entry with only an id and a title
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: EntryId::from_value(id),
            title: title.into(),
            title_norm: String::new(),
            isrc: None,
            iswc: None,
            evidence_tokens: BTreeSet::new(),
            gold_tokens: BTreeSet::new(),
        }
    }

    /// Set the ISRC
    pub fn with_isrc(mut self, isrc: impl Into<String>) -> Self {
        self.isrc = Some(isrc.into());
        self
    }

    /// Set the ISWC
    pub fn with_iswc(mut self, iswc: impl Into<String>) -> Self {
        self.iswc = Some(iswc.into());
        self
    }

    /// Add evidence tokens
    pub fn with_evidence_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evidence_tokens.extend(tokens.into_iter().map(Into::into));
        self
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

    /// Whether the entry carries either identifier
    pub fn has_identifier(&self) -> bool {
        self.isrc.is_some() || self.iswc.is_some()
    }

    /// Audit view of this entry
    pub fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            id: self.id,
            title: self.title.clone(),
            isrc: self.isrc.clone(),
            iswc: self.iswc.clone(),
        }
    }
}

/// The fields of a chosen catalog entry shown in audit output
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateSummary {
    /// Catalog entry id
    pub id: EntryId,
    /// Catalog title
    pub title: String,
    /// Canonical ISRC, if any
    pub isrc: Option<String>,
    /// Canonical ISWC, if any
    pub iswc: Option<String>,
}

impl CandidateSummary {
    /// True when neither identifier is present (a truth gap when matched)
    pub fn lacks_identifiers(&self) -> bool {
        self.isrc.is_none() && self.iswc.is_none()
    }
}
