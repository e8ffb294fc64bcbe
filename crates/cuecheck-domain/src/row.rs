//! Usage rows - one line of a third-party usage report

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Deserialize a string field, reading `null` as empty
///
/// Extractors emit `null` for cells they could not read; the boundary check
/// then rejects the value instead of the whole file.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rejection of a row at the scoring boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// Title absent or blank
    #[error("Malformed row {source_ref:?}: title is missing")]
    MissingTitle {
        /// Provenance of the rejected row
        source_ref: String,
    },
}

/// A usage-report row as produced by the external extractor
///
/// `source_ref` is opaque provenance (file/sheet/row) and is never consulted
/// for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRow {
    /// Reported title (required)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Reported artist and/or author, free text
    #[serde(default, alias = "artist", alias = "author")]
    pub artist_author: Option<String>,

    /// Provenance of the row
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_ref: String,

    /// Reported ISRC, raw
    #[serde(default)]
    pub isrc: Option<String>,

    /// Reported ISWC, raw
    #[serde(default)]
    pub iswc: Option<String>,

    /// Any other free text the extractor kept (publisher, notes, ...)
    #[serde(default)]
    pub supplementary: Vec<String>,
}

impl UsageRow {
    /// Create a row with a title and provenance
    pub fn new(title: impl Into<String>, source_ref: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source_ref: source_ref.into(),
            ..Self::default()
        }
    }

    /// Set the artist/author field
    pub fn with_artist(mut self, artist_author: impl Into<String>) -> Self {
        self.artist_author = Some(artist_author.into());
        self
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

    /// Add supplementary free text
    pub fn with_supplementary(mut self, text: impl Into<String>) -> Self {
        self.supplementary.push(text.into());
        self
    }

    /// Check the boundary contract
    pub fn validate(&self) -> Result<(), RowError> {
        if self.title.trim().is_empty() {
            return Err(RowError::MissingTitle {
                source_ref: self.source_ref.clone(),
            });
        }
        Ok(())
    }

    /// Artist/author text if present and not blank
    pub fn artist(&self) -> Option<&str> {
        self.artist_author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    /// Title, artist/author and supplementary text joined by spaces
    pub fn combined_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str()];
        if let Some(artist) = self.artist() {
            parts.push(artist);
        }
        parts.extend(self.supplementary.iter().map(String::as_str));
        parts.join(" ")
    }
}
