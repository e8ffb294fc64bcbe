//! Trait definitions for external interactions
//!
//! The resolver only needs read access to the catalog; the concrete index
//! lives in `cuecheck-index`.

use crate::ReferenceEntry;

/// Result of an identifier lookup
///
/// The ISRC and ISWC paths are independent: a row may hit one entry by ISRC
/// and another by ISWC.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierHits<'a> {
    /// Entry whose ISRC equals the row ISRC
    pub by_isrc: Option<&'a ReferenceEntry>,
    /// Entry whose ISWC equals the row ISWC
    pub by_iswc: Option<&'a ReferenceEntry>,
}

impl<'a> IdentifierHits<'a> {
    /// True when neither identifier matched
    pub fn is_empty(&self) -> bool {
        self.by_isrc.is_none() && self.by_iswc.is_none()
    }

    /// Distinct matched entries, ordered by entry id
    pub fn entries(&self) -> Vec<&'a ReferenceEntry> {
        let mut entries: Vec<&'a ReferenceEntry> =
            self.by_isrc.into_iter().chain(self.by_iswc).collect();
        entries.sort_by_key(|e| e.id);
        entries.dedup_by_key(|e| e.id);
        entries
    }
}

/// Read-only, query-optimized view over the reference catalog
///
/// Implemented by the infrastructure layer (cuecheck-index). Implementations
/// must be immutable for the lifetime of a scoring run.
pub trait ReferenceLookup {
    /// Exact lookup by canonical identifiers
    fn lookup_by_identifier(&self, isrc: Option<&str>, iswc: Option<&str>) -> IdentifierHits<'_>;

    /// All entries whose normalized title equals `title_norm`, ordered by id
    fn lookup_by_title(&self, title_norm: &str) -> &[ReferenceEntry];

    /// Number of indexed entries
    fn len(&self) -> usize;

    /// True when nothing is indexed
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
