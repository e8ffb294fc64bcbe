//! Order-independent fold over evidence records
//!
//! Every piece of state is a sum, a set union keyed by record, or a
//! minimum, so partial aggregates built on any partition of the records
//! merge to the same result. Ranking and limits are applied only in
//! [`Aggregate::finish`].
//!
//! A record is identified by its ordinal together with its provenance, so
//! records of several scoring runs (each numbering from 0) can be folded
//! together.

use crate::report::{ActionSheet, AggregateReport, DedupGroup, DedupTable, TruthGap, TruthGapTable};
use crate::AggregatorConfig;
use cuecheck_domain::{EvidenceFlag, EvidenceRecord, FlatRecord, Tier};
use rayon::prelude::*;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RecordKey {
    ordinal: usize,
    source_ref: String,
}

impl RecordKey {
    fn of(record: &EvidenceRecord) -> Self {
        Self {
            ordinal: record.ordinal,
            source_ref: record.source_ref.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct DedupKey {
    title_norm: String,
    identifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupState {
    occurrences: usize,
    sources: BTreeSet<String>,
    first_ordinal: usize,
    example_title: String,
}

impl GroupState {
    fn merge(&mut self, other: GroupState) {
        self.occurrences += other.occurrences;
        self.sources.extend(other.sources);
        if other.first_ordinal < self.first_ordinal {
            self.first_ordinal = other.first_ordinal;
            self.example_title = other.example_title;
        }
    }
}

/// Partial aggregate over a subset of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    records: usize,
    tier_counts: BTreeMap<Tier, usize>,
    groups: BTreeMap<DedupKey, GroupState>,
    truth_gaps: BTreeMap<RecordKey, TruthGap>,
    gold: BTreeMap<RecordKey, EvidenceRecord>,
    silver: BTreeMap<RecordKey, EvidenceRecord>,
    suspects: BTreeMap<RecordKey, EvidenceRecord>,
    person_evidence: BTreeMap<RecordKey, EvidenceRecord>,
}

impl Aggregate {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold records sequentially
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a EvidenceRecord>,
    {
        let mut aggregate = Self::new();
        for record in records {
            aggregate.push(record);
        }
        aggregate
    }

    /// Fold records in parallel chunks and merge the partials
    pub fn from_records_sharded(records: &[EvidenceRecord], shard_size: usize) -> Self {
        records
            .par_chunks(shard_size.max(1))
            .map(Self::from_records)
            .reduce(Self::new, Self::merge)
    }

    /// Number of records folded
    pub fn len(&self) -> usize {
        self.records
    }

    /// True when nothing has been folded
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Fold one record
    ///
    /// (ordinal, source_ref) pairs must be unique across every partial that
    /// is later merged.
    pub fn push(&mut self, record: &EvidenceRecord) {
        self.records += 1;
        *self.tier_counts.entry(record.match_tier).or_insert(0) += 1;

        if !record.matched() {
            if has_person_evidence(record) {
                self.person_evidence.insert(RecordKey::of(record), record.clone());
            }
            return;
        }

        self.push_group(record);

        let strong = matches!(record.match_tier, Tier::Gold | Tier::Silver);
        if !strong {
            return;
        }

        if let Some(candidate) = record.best_candidate.as_ref().filter(|c| c.lacks_identifiers()) {
            self.truth_gaps.insert(
                RecordKey::of(record),
                TruthGap {
                    ordinal: record.ordinal,
                    source_ref: record.source_ref.clone(),
                    match_tier: record.match_tier,
                    ref_id: candidate.id,
                    ref_title: candidate.title.clone(),
                },
            );
        }

        if !record.has_flag(EvidenceFlag::TitleExact) && !record.has_flag(EvidenceFlag::ArtistTokenOverlap) {
            self.suspects.insert(RecordKey::of(record), record.clone());
        }

        match record.match_tier {
            Tier::Gold => {
                self.gold.insert(RecordKey::of(record), record.clone());
            }
            Tier::Silver => {
                self.silver.insert(RecordKey::of(record), record.clone());
            }
            Tier::Bronze | Tier::NoMatch => {}
        }
    }

    fn push_group(&mut self, record: &EvidenceRecord) {
        let candidate = record.best_candidate.as_ref();
        let key = DedupKey {
            title_norm: record.title_norm.clone(),
            identifier: candidate.and_then(|c| c.isrc.clone().or_else(|| c.iswc.clone())),
        };
        let example_title = candidate
            .map(|c| c.title.clone())
            .unwrap_or_else(|| record.title_norm.clone());
        let state = GroupState {
            occurrences: 1,
            sources: BTreeSet::from([record.source_ref.clone()]),
            first_ordinal: record.ordinal,
            example_title,
        };

        match self.groups.get_mut(&key) {
            Some(existing) => existing.merge(state),
            None => {
                self.groups.insert(key, state);
            }
        }
    }

    /// Combine two partial aggregates
    ///
    /// Associative and commutative for partials with disjoint ordinals.
    pub fn merge(mut self, other: Aggregate) -> Aggregate {
        self.records += other.records;
        for (tier, count) in other.tier_counts {
            *self.tier_counts.entry(tier).or_insert(0) += count;
        }
        for (key, state) in other.groups {
            match self.groups.get_mut(&key) {
                Some(existing) => existing.merge(state),
                None => {
                    self.groups.insert(key, state);
                }
            }
        }
        self.truth_gaps.extend(other.truth_gaps);
        self.gold.extend(other.gold);
        self.silver.extend(other.silver);
        self.suspects.extend(other.suspects);
        self.person_evidence.extend(other.person_evidence);
        self
    }

    /// Derive the audit artifacts
    pub fn finish(self, config: &AggregatorConfig) -> AggregateReport {
        let dedup = self.dedup_table(config);
        let truth_gaps = self.truth_gap_table();
        let action_sheet = self.action_sheet(config);

        let person_evidence = self.person_evidence_queue();

        info!(
            "Aggregated {} records: {} duplicate groups listed (max size {}), {} truth gaps, {} action rows, {} person-evidence rows",
            self.records,
            dedup.groups.len(),
            dedup.max_group_size,
            truth_gaps.rows.len(),
            action_sheet.rows.len(),
            person_evidence.len()
        );

        AggregateReport {
            records: self.records,
            tier_counts: self.tier_counts,
            dedup,
            truth_gaps,
            action_sheet,
            suspects: self.suspects.values().map(EvidenceRecord::to_flat).collect(),
            person_evidence,
        }
    }

    fn person_evidence_queue(&self) -> Vec<FlatRecord> {
        let mut queue: Vec<&EvidenceRecord> = self.person_evidence.values().collect();
        // Stable sort keeps (ordinal, source_ref) order among equals
        queue.sort_by_key(|r| {
            (
                Reverse(has_identifier_evidence(r)),
                Reverse(r.has_flag(EvidenceFlag::TitleExact)),
                Reverse(r.has_flag(EvidenceFlag::ArtistTokenOverlap)),
            )
        });
        queue.into_iter().map(EvidenceRecord::to_flat).collect()
    }

    fn dedup_table(&self, config: &AggregatorConfig) -> DedupTable {
        let max_group_size = self.groups.values().map(|g| g.occurrences).max().unwrap_or(0);

        let mut groups: Vec<DedupGroup> = self
            .groups
            .iter()
            .filter(|(_, state)| state.occurrences >= config.dedup_min_occurrences)
            .map(|(key, state)| DedupGroup {
                title_norm: key.title_norm.clone(),
                identifier: key.identifier.clone(),
                occurrences: state.occurrences,
                distinct_sources: state.sources.len(),
                example_title: state.example_title.clone(),
                first_ordinal: state.first_ordinal,
            })
            .collect();
        // BTreeMap order breaks ties by key
        groups.sort_by_key(|g| Reverse(g.occurrences));

        DedupTable {
            groups,
            total_groups: self.groups.len(),
            max_group_size,
        }
    }

    fn truth_gap_table(&self) -> TruthGapTable {
        let strong = self.tier_count(Tier::Gold) + self.tier_count(Tier::Silver);
        let rows: Vec<TruthGap> = self.truth_gaps.values().cloned().collect();
        let distinct_entries = rows.iter().map(|g| g.ref_id).collect::<BTreeSet<_>>().len();
        let rate = if strong == 0 {
            0.0
        } else {
            rows.len() as f64 / strong as f64
        };

        TruthGapTable {
            rows,
            distinct_entries,
            rate,
        }
    }

    fn action_sheet(&self, config: &AggregatorConfig) -> ActionSheet {
        let gold_sources: BTreeSet<&str> = self.gold.values().map(|r| r.source_ref.as_str()).collect();

        let mut silver: Vec<&EvidenceRecord> = self
            .silver
            .values()
            .filter(|r| !gold_sources.contains(r.source_ref.as_str()))
            .collect();
        let silver_shadowed = self.silver.len() - silver.len();
        silver.sort_by(|a, b| silver_rank(a, b));

        let silver_truncated = silver.len().saturating_sub(config.silver_limit);
        silver.truncate(config.silver_limit);
        debug!(
            "Action sheet: {} silver shadowed by gold, {} over the limit",
            silver_shadowed, silver_truncated
        );

        let rows = self
            .gold
            .values()
            .chain(silver.iter().copied())
            .map(EvidenceRecord::to_flat)
            .collect();

        ActionSheet {
            rows,
            gold: self.gold.len(),
            silver: silver.len(),
            silver_shadowed,
            silver_truncated,
        }
    }

    fn tier_count(&self, tier: Tier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }
}

/// Identifier hit on the row, or an identifier on the audited candidate
fn has_identifier_evidence(record: &EvidenceRecord) -> bool {
    record.has_flag(EvidenceFlag::IsrcMatch)
        || record.has_flag(EvidenceFlag::IswcMatch)
        || record
            .best_candidate
            .as_ref()
            .is_some_and(|c| !c.lacks_identifiers())
}

/// Unmatched record that still carries artist or identifier evidence
fn has_person_evidence(record: &EvidenceRecord) -> bool {
    record.has_flag(EvidenceFlag::ArtistTokenOverlap) || has_identifier_evidence(record)
}

/// Silver review order: fewest candidates, then most evidence, then input order
fn silver_rank(a: &EvidenceRecord, b: &EvidenceRecord) -> Ordering {
    a.ref_match_count
        .cmp(&b.ref_match_count)
        .then_with(|| b.evidence_flags.len().cmp(&a.evidence_flags.len()))
        .then_with(|| a.ordinal.cmp(&b.ordinal))
        .then_with(|| a.source_ref.cmp(&b.source_ref))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuecheck_domain::{CandidateSummary, EntryId, EvidenceFlags};

    fn record(ordinal: usize, tier: Tier, title: &str, source: &str) -> EvidenceRecord {
        EvidenceRecord {
            ordinal,
            source_ref: source.to_string(),
            title_norm: title.to_string(),
            match_tier: tier,
            evidence_flags: EvidenceFlags::new().with(EvidenceFlag::TitleExact),
            ref_match_count: 1,
            best_candidate: Some(CandidateSummary {
                id: EntryId::from_value(ordinal as u64 + 100),
                title: title.to_string(),
                isrc: Some(format!("BRXXX00{:05}", ordinal)),
                iswc: None,
            }),
        }
    }

    fn no_identifiers(mut record: EvidenceRecord) -> EvidenceRecord {
        if let Some(c) = record.best_candidate.as_mut() {
            c.isrc = None;
            c.iswc = None;
        }
        record
    }

    #[test]
    fn test_tier_counts_include_no_match() {
        let records = vec![
            record(0, Tier::Gold, "A", "f#1"),
            record(1, Tier::NoMatch, "B", "f#2"),
            record(2, Tier::NoMatch, "C", "f#3"),
        ];
        let report = Aggregate::from_records(&records).finish(&AggregatorConfig::default());
        assert_eq!(report.records, 3);
        assert_eq!(report.tier_count(Tier::NoMatch), 2);
        assert_eq!(report.tier_count(Tier::Gold), 1);
    }

    #[test]
    fn test_dedup_groups_by_title_and_identifier() {
        let mut records = Vec::new();
        for (i, source) in ["a.xlsx#1", "a.xlsx#2", "b.xlsx#1"].iter().enumerate() {
            let mut r = no_identifiers(record(i, Tier::Silver, "DIANA", source));
            if let Some(c) = r.best_candidate.as_mut() {
                c.iswc = Some("T0390364571".to_string());
                c.title = "Diana".to_string();
            }
            records.push(r);
        }
        records.push(record(3, Tier::Bronze, "DIANA", "c.xlsx#1"));
        records.push(record(4, Tier::NoMatch, "DIANA", "c.xlsx#2"));

        let report = Aggregate::from_records(&records).finish(&AggregatorConfig::default());
        assert_eq!(report.dedup.total_groups, 2);
        assert_eq!(report.dedup.max_group_size, 3);
        assert_eq!(report.dedup.groups.len(), 1);

        let group = &report.dedup.groups[0];
        assert_eq!(group.identifier.as_deref(), Some("T0390364571"));
        assert_eq!(group.occurrences, 3);
        assert_eq!(group.distinct_sources, 3);
        assert_eq!(group.example_title, "Diana");
        assert_eq!(group.first_ordinal, 0);
    }

    #[test]
    fn test_lenient_lists_singletons() {
        let records = vec![record(0, Tier::Gold, "A", "f#1"), record(1, Tier::Gold, "B", "f#2")];
        let report = Aggregate::from_records(&records).finish(&AggregatorConfig::lenient());
        assert_eq!(report.dedup.groups.len(), 2);
        assert_eq!(report.dedup.max_group_size, 1);
    }

    #[test]
    fn test_truth_gap_rate() {
        let records = vec![
            no_identifiers(record(0, Tier::Gold, "A", "f#1")),
            record(1, Tier::Gold, "B", "f#2"),
            no_identifiers(record(2, Tier::Silver, "C", "f#3")),
            record(3, Tier::Silver, "D", "f#4"),
            no_identifiers(record(4, Tier::Bronze, "E", "f#5")),
        ];
        let report = Aggregate::from_records(&records).finish(&AggregatorConfig::default());

        let ordinals: Vec<usize> = report.truth_gaps.rows.iter().map(|g| g.ordinal).collect();
        assert_eq!(ordinals, vec![0, 2]);
        assert_eq!(report.truth_gaps.distinct_entries, 2);
        assert!((report.truth_gaps.rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_truth_gap_rate_without_strong_records() {
        let records = vec![record(0, Tier::Bronze, "A", "f#1")];
        let report = Aggregate::from_records(&records).finish(&AggregatorConfig::default());
        assert_eq!(report.truth_gaps.rate, 0.0);
        assert!(report.truth_gaps.rows.is_empty());
    }

    #[test]
    fn test_action_sheet_ranking() {
        let mut crowded = record(1, Tier::Silver, "B", "f#2");
        crowded.ref_match_count = 3;
        let mut rich = record(2, Tier::Silver, "C", "f#3");
        rich.evidence_flags.insert(EvidenceFlag::ArtistTokenOverlap);
        let plain = record(3, Tier::Silver, "D", "f#4");
        let gold = record(4, Tier::Gold, "E", "f#5");

        let records = vec![crowded, rich, plain, gold];
        let config = AggregatorConfig {
            silver_limit: 2,
            ..AggregatorConfig::default()
        };
        let report = Aggregate::from_records(&records).finish(&config);

        let ordinals: Vec<usize> = report.action_sheet.rows.iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![4, 2, 3]);
        assert_eq!(report.action_sheet.gold, 1);
        assert_eq!(report.action_sheet.silver, 2);
        assert_eq!(report.action_sheet.silver_truncated, 1);
    }

    #[test]
    fn test_silver_shadowed_by_gold_source() {
        let records = vec![
            record(0, Tier::Gold, "A", "f#1"),
            record(1, Tier::Silver, "A", "f#1"),
            record(2, Tier::Silver, "B", "f#2"),
        ];
        let report = Aggregate::from_records(&records).finish(&AggregatorConfig::default());
        let ordinals: Vec<usize> = report.action_sheet.rows.iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![0, 2]);
        assert_eq!(report.action_sheet.silver_shadowed, 1);
    }

    #[test]
    fn test_suspects() {
        let mut identifier_only = record(0, Tier::Gold, "A", "f#1");
        identifier_only.evidence_flags = EvidenceFlags::new().with(EvidenceFlag::IsrcMatch);
        let supported = record(1, Tier::Gold, "B", "f#2");
        let mut bronze = record(2, Tier::Bronze, "C", "f#3");
        bronze.evidence_flags = EvidenceFlags::new();

        let report = Aggregate::from_records(&[identifier_only, supported, bronze])
            .finish(&AggregatorConfig::default());
        assert_eq!(report.suspects.len(), 1);
        assert_eq!(report.suspects[0].ordinal, 0);
    }

    #[test]
    fn test_records_from_separate_runs_are_kept_apart() {
        let first = no_identifiers(record(0, Tier::Gold, "A", "run-a.xlsx#2"));
        let mut second = no_identifiers(record(0, Tier::Gold, "B", "run-b.xlsx#2"));
        second.evidence_flags = EvidenceFlags::new().with(EvidenceFlag::IsrcMatch);

        let report = Aggregate::from_records(&[first, second]).finish(&AggregatorConfig::default());
        assert_eq!(report.tier_count(Tier::Gold), 2);
        assert_eq!(report.action_sheet.gold, 2);
        assert_eq!(report.truth_gaps.rows.len(), 2);
        assert_eq!(report.suspects.len(), 1);
        assert_eq!(report.suspects[0].source_ref, "run-b.xlsx#2");
    }

    #[test]
    fn test_person_evidence_queue() {
        let mut overlap = no_identifiers(record(0, Tier::NoMatch, "A", "f#1"));
        overlap.evidence_flags = EvidenceFlags::new()
            .with(EvidenceFlag::ArtistTokenOverlap)
            .with(EvidenceFlag::NegativeTitleTrigger);
        let mut identifier_only = record(1, Tier::NoMatch, "B", "f#2");
        identifier_only.evidence_flags = EvidenceFlags::new().with(EvidenceFlag::ArtistPresentNoSupport);
        let mut denied = record(2, Tier::NoMatch, "C", "f#3");
        denied.evidence_flags = EvidenceFlags::new()
            .with(EvidenceFlag::TitleExact)
            .with(EvidenceFlag::DenyTokenHit);
        let mut nothing = no_identifiers(record(3, Tier::NoMatch, "D", "f#4"));
        nothing.evidence_flags = EvidenceFlags::new().with(EvidenceFlag::ArtistPresentNoSupport);
        let matched = record(4, Tier::Silver, "E", "f#5");

        let report = Aggregate::from_records(&[overlap, identifier_only, denied, nothing, matched])
            .finish(&AggregatorConfig::default());

        // identifier evidence first, then title and artist support, then ordinal
        let ordinals: Vec<usize> = report.person_evidence.iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![2, 1, 0]);
        assert!(report.person_evidence.iter().all(|r| r.match_tier == "NoMatch"));
    }

    #[test]
    fn test_sharded_matches_sequential() {
        let records: Vec<EvidenceRecord> = (0..40)
            .map(|i| {
                let tier = Tier::ALL[i % 4];
                record(i, tier, ["A", "B", "C"][i % 3], &format!("f#{}", i % 7))
            })
            .collect();
        let sequential = Aggregate::from_records(&records);
        for shard_size in [1, 3, 16] {
            assert_eq!(Aggregate::from_records_sharded(&records, shard_size), sequential);
        }
    }
}
