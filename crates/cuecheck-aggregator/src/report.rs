//! Audit artifacts produced by a finished aggregate

use cuecheck_domain::{EntryId, FlatRecord, Tier};
use serde::Serialize;
use std::collections::BTreeMap;

/// Records sharing a normalized title and identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DedupGroup {
    /// Normalized title
    pub title_norm: String,
    /// Best-candidate ISRC, else ISWC, when present
    pub identifier: Option<String>,
    /// Records in the group
    pub occurrences: usize,
    /// Distinct provenance values in the group
    pub distinct_sources: usize,
    /// Display title of the earliest record's candidate
    pub example_title: String,
    /// Earliest ordinal in the group
    pub first_ordinal: usize,
}

/// Duplicate-usage table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupTable {
    /// Listed groups, most frequent first
    pub groups: Vec<DedupGroup>,
    /// Groups before the occurrence filter
    pub total_groups: usize,
    /// Largest group size over all groups
    pub max_group_size: usize,
}

/// A matched record whose catalog entry has no identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruthGap {
    /// Row ordinal
    pub ordinal: usize,
    /// Row provenance
    pub source_ref: String,
    /// Row tier (Gold or Silver)
    pub match_tier: Tier,
    /// Catalog entry lacking identifiers
    pub ref_id: EntryId,
    /// Its display title
    pub ref_title: String,
}

/// Catalog enrichment table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TruthGapTable {
    /// Gap rows ordered by ordinal
    pub rows: Vec<TruthGap>,
    /// Distinct catalog entries involved
    pub distinct_entries: usize,
    /// Gap rows over Gold + Silver records (0 when there are none)
    pub rate: f64,
}

/// Curated review subset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionSheet {
    /// Gold rows (by ordinal) followed by ranked Silver rows
    pub rows: Vec<FlatRecord>,
    /// Gold rows on the sheet
    pub gold: usize,
    /// Silver rows on the sheet
    pub silver: usize,
    /// Silver records left out because their source already has a Gold row
    pub silver_shadowed: usize,
    /// Silver records left out by the limit
    pub silver_truncated: usize,
}

/// Everything derived from one scoring run's records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateReport {
    /// Records folded
    pub records: usize,
    /// Records per tier
    pub tier_counts: BTreeMap<Tier, usize>,
    /// Duplicate groups
    pub dedup: DedupTable,
    /// Matched records missing catalog identifiers
    pub truth_gaps: TruthGapTable,
    /// Review subset
    pub action_sheet: ActionSheet,
    /// Gold/Silver records without title or artist support, for QC
    pub suspects: Vec<FlatRecord>,
    /// Unmatched records carrying artist overlap or identifier evidence
    pub person_evidence: Vec<FlatRecord>,
}

impl AggregateReport {
    /// Records assigned `tier`
    pub fn tier_count(&self, tier: Tier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }
}
