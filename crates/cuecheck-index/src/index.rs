//! In-memory reference index

use crate::{IndexError, IndexReport};
use cuecheck_domain::identifier::{optional_isrc, optional_iswc};
use cuecheck_domain::traits::{IdentifierHits, ReferenceLookup};
use cuecheck_domain::{EntryId, Normalizer, ReferenceEntry};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::ops::Range;
use tracing::{debug, info, warn};

/// Immutable view over the catalog built once per scoring run
///
/// Title lookups are one-to-many (several recordings share a title);
/// identifier lookups are exact and return at most one entry.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    /// Admitted entries sorted by (title_norm, id)
    entries: Vec<ReferenceEntry>,
    by_title: HashMap<String, Range<usize>>,
    by_isrc: HashMap<String, usize>,
    by_iswc: HashMap<String, usize>,
    by_id: HashMap<EntryId, usize>,
    report: IndexReport,
}

impl ReferenceIndex {
    /// Build the index, excluding and counting malformed entries
    ///
    /// `normalizer` must be the same instance the scorer uses for rows.
    pub fn build<I>(entries: I, normalizer: &Normalizer) -> Self
    where
        I: IntoIterator<Item = ReferenceEntry>,
    {
        let mut report = IndexReport::default();
        let mut seen_ids = HashSet::new();
        let mut admitted = Vec::new();

        for (position, entry) in entries.into_iter().enumerate() {
            report.entries_in += 1;
            match prepare_entry(entry, normalizer, &mut report) {
                Ok(entry) if !seen_ids.insert(entry.id) => {
                    let error = IndexError::DuplicateId { id: entry.id };
                    warn!("Excluding catalog entry at position {}: {}", position, error);
                    report.record_exclusion(position, error);
                }
                Ok(entry) => admitted.push(entry),
                Err(error) => {
                    warn!("Excluding catalog entry at position {}: {}", position, error);
                    report.record_exclusion(position, error);
                }
            }
        }

        let index = Self::from_admitted(admitted, report);
        info!(
            "Reference index built: {} admitted, {} excluded, {} distinct titles",
            index.report.admitted,
            index.report.excluded.len(),
            index.report.distinct_titles
        );
        index
    }

    /// Build the index, failing on the first malformed entry
    pub fn build_strict<I>(entries: I, normalizer: &Normalizer) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = ReferenceEntry>,
    {
        let index = Self::build(entries, normalizer);
        match index.report.excluded.first() {
            Some(excluded) => Err(excluded.error.clone()),
            None => Ok(index),
        }
    }

    fn from_admitted(mut entries: Vec<ReferenceEntry>, mut report: IndexReport) -> Self {
        entries.sort_by(|a, b| a.title_norm.cmp(&b.title_norm).then(a.id.cmp(&b.id)));

        let mut by_title: HashMap<String, Range<usize>> = HashMap::new();
        let mut start = 0;
        while start < entries.len() {
            let title = &entries[start].title_norm;
            let end = start
                + entries[start..]
                    .iter()
                    .take_while(|e| &e.title_norm == title)
                    .count();
            if end - start > 1 {
                report.shared_titles += 1;
            }
            by_title.insert(title.clone(), start..end);
            start = end;
        }

        // Lowest id owns a contested identifier
        let mut by_id_order: Vec<usize> = (0..entries.len()).collect();
        by_id_order.sort_by_key(|&i| entries[i].id);

        let mut by_isrc = HashMap::new();
        let mut by_iswc = HashMap::new();
        let mut by_id = HashMap::new();
        for &i in &by_id_order {
            let entry = &entries[i];
            by_id.insert(entry.id, i);
            if let Some(isrc) = &entry.isrc {
                if by_isrc.contains_key(isrc) {
                    warn!("ISRC {} already indexed; entry {} reachable by title only", isrc, entry.id);
                    report.identifier_collisions += 1;
                } else {
                    by_isrc.insert(isrc.clone(), i);
                }
            }
            if let Some(iswc) = &entry.iswc {
                if by_iswc.contains_key(iswc) {
                    warn!("ISWC {} already indexed; entry {} reachable by title only", iswc, entry.id);
                    report.identifier_collisions += 1;
                } else {
                    by_iswc.insert(iswc.clone(), i);
                }
            }
        }

        report.admitted = entries.len();
        report.distinct_titles = by_title.len();

        Self {
            entries,
            by_title,
            by_isrc,
            by_iswc,
            by_id,
            report,
        }
    }

    /// Build statistics
    pub fn report(&self) -> &IndexReport {
        &self.report
    }

    /// Entry by catalog id
    pub fn get(&self, id: EntryId) -> Option<&ReferenceEntry> {
        self.by_id.get(&id).map(|&i| &self.entries[i])
    }

    /// All admitted entries, ordered by (title_norm, id)
    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }
}

impl ReferenceLookup for ReferenceIndex {
    fn lookup_by_identifier(&self, isrc: Option<&str>, iswc: Option<&str>) -> IdentifierHits<'_> {
        IdentifierHits {
            by_isrc: isrc
                .and_then(|k| self.by_isrc.get(k))
                .map(|&i| &self.entries[i]),
            by_iswc: iswc
                .and_then(|k| self.by_iswc.get(k))
                .map(|&i| &self.entries[i]),
        }
    }

    fn lookup_by_title(&self, title_norm: &str) -> &[ReferenceEntry] {
        match self.by_title.get(title_norm) {
            Some(range) => &self.entries[range.clone()],
            None => &[],
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Validate one snapshot entry and derive its indexed form
fn prepare_entry(
    mut entry: ReferenceEntry,
    normalizer: &Normalizer,
    report: &mut IndexReport,
) -> Result<ReferenceEntry, IndexError> {
    let title_norm = normalizer.normalize(&entry.title);
    if title_norm.is_empty() {
        return Err(IndexError::MissingTitle { id: entry.id });
    }
    entry.title = entry.title.trim().to_string();
    entry.title_norm = title_norm;

    let raw_isrc = entry.isrc.take();
    entry.isrc = optional_isrc(raw_isrc.as_deref());
    if entry.isrc.is_none() && raw_isrc.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        debug!("Entry {}: dropping implausible ISRC {:?}", entry.id, raw_isrc);
        report.identifiers_dropped += 1;
    }

    let raw_iswc = entry.iswc.take();
    entry.iswc = optional_iswc(raw_iswc.as_deref());
    if entry.iswc.is_none() && raw_iswc.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        debug!("Entry {}: dropping implausible ISWC {:?}", entry.id, raw_iswc);
        report.identifiers_dropped += 1;
    }

    let gold_tokens: BTreeSet<String> = entry
        .gold_tokens
        .iter()
        .map(|t| normalizer.normalize(t))
        .filter(|t| !t.is_empty())
        .collect();

    // Gold tokens are a subset of the evidence tokens
    let evidence_tokens: BTreeSet<String> = entry
        .evidence_tokens
        .iter()
        .chain(entry.gold_tokens.iter())
        .flat_map(|t| normalizer.tokenize(t))
        .collect();

    entry.gold_tokens = gold_tokens;
    entry.evidence_tokens = evidence_tokens;
    Ok(entry)
}
