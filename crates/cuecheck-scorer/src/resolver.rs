//! Candidate resolution
//!
//! Identifiers are authoritative: when either the row ISRC or ISWC hits the
//! index, those entries are the candidate set and the title path is not
//! consulted. Otherwise every entry sharing the normalized title is a
//! candidate.

use cuecheck_domain::identifier::{optional_isrc, optional_iswc};
use cuecheck_domain::traits::ReferenceLookup;
use cuecheck_domain::{Normalizer, ReferenceEntry, UsageRow};
use std::collections::BTreeSet;

/// A usage row in comparison form
///
/// Computed once per row; resolution, evidence extraction and classification
/// all read from it.
#[derive(Debug, Clone)]
pub struct RowView<'r> {
    /// The raw row
    pub row: &'r UsageRow,
    /// Normalized title
    pub title_norm: String,
    /// Canonical row ISRC, if plausible
    pub isrc: Option<String>,
    /// Canonical row ISWC, if plausible
    pub iswc: Option<String>,
    /// Normalized title + artist/author + supplementary text
    pub combined_norm: String,
    /// Words of `combined_norm`
    pub combined_words: BTreeSet<String>,
    /// Artist/author comparison tokens
    pub artist_tokens: Vec<String>,
    /// Whether the artist/author field carries any text
    pub artist_present: bool,
}

impl<'r> RowView<'r> {
    /// Normalize a row
    pub fn new(row: &'r UsageRow, normalizer: &Normalizer) -> Self {
        let combined_norm = normalizer.normalize(&row.combined_text());
        let combined_words = normalizer.words(&combined_norm).into_iter().collect();
        let artist = row.artist();
        Self {
            row,
            title_norm: normalizer.normalize(&row.title),
            isrc: optional_isrc(row.isrc.as_deref()),
            iswc: optional_iswc(row.iswc.as_deref()),
            combined_norm,
            combined_words,
            artist_tokens: artist.map(|a| normalizer.tokenize(a)).unwrap_or_default(),
            artist_present: artist.is_some_and(|a| !normalizer.normalize(a).is_empty()),
        }
    }

    /// Length of the normalized title in characters
    pub fn title_len(&self) -> usize {
        self.title_norm.chars().count()
    }
}

/// Which lookup produced the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// ISRC and/or ISWC hit
    Identifier,
    /// Normalized title hit
    Title,
    /// Nothing matched
    Unresolved,
}

/// Candidate set for one row
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// Path that fired
    pub path: ResolutionPath,
    /// Candidate entries, ordered by id
    pub candidates: Vec<&'a ReferenceEntry>,
}

impl<'a> Resolution<'a> {
    /// Number of candidates
    pub fn ref_match_count(&self) -> usize {
        self.candidates.len()
    }

    /// Candidate shown in the audit record
    pub fn best_candidate(&self) -> Option<&'a ReferenceEntry> {
        select_best(&self.candidates)
    }
}

/// Pick the audit candidate
///
/// Prefers an entry carrying an ISRC, then one carrying an ISWC, then any;
/// ties go to the lowest entry id. The choice never affects the tier.
pub fn select_best<'a>(candidates: &[&'a ReferenceEntry]) -> Option<&'a ReferenceEntry> {
    candidates.iter().copied().min_by_key(|entry| {
        let rank = if entry.isrc.is_some() {
            0
        } else if entry.iswc.is_some() {
            1
        } else {
            2
        };
        (rank, entry.id)
    })
}

/// Looks up candidate reference entries for rows
pub struct CandidateResolver<'a, L: ReferenceLookup + ?Sized> {
    index: &'a L,
}

impl<'a, L: ReferenceLookup + ?Sized> CandidateResolver<'a, L> {
    /// Create a resolver over an index
    pub fn new(index: &'a L) -> Self {
        Self { index }
    }

    /// Resolve the candidate set for a row
    pub fn resolve(&self, view: &RowView<'_>) -> Resolution<'a> {
        let hits = self
            .index
            .lookup_by_identifier(view.isrc.as_deref(), view.iswc.as_deref());
        if !hits.is_empty() {
            return Resolution {
                path: ResolutionPath::Identifier,
                candidates: hits.entries(),
            };
        }

        let by_title = self.index.lookup_by_title(&view.title_norm);
        if by_title.is_empty() {
            return Resolution {
                path: ResolutionPath::Unresolved,
                candidates: Vec::new(),
            };
        }

        Resolution {
            path: ResolutionPath::Title,
            candidates: by_title.iter().collect(),
        }
    }
}
