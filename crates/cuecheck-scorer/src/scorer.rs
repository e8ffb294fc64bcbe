//! Row scoring pipeline: resolve → extract → classify

use crate::classifier::{RowFacts, TierClassifier};
use crate::evidence::EvidenceExtractor;
use crate::resolver::{CandidateResolver, RowView};
use crate::{ScoringRules, ScoringStats};
use cuecheck_domain::traits::ReferenceLookup;
use cuecheck_domain::{EvidenceFlag, EvidenceFlags, EvidenceRecord, RowError, Tier, UsageRow};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

/// Records and counters from scoring a batch of rows
#[derive(Debug, Clone, Default)]
pub struct ScoredBatch {
    /// Records ordered by ordinal
    pub records: Vec<EvidenceRecord>,
    /// Counters for the batch
    pub stats: ScoringStats,
}

impl ScoredBatch {
    fn merge(mut self, other: ScoredBatch) -> ScoredBatch {
        self.records.extend(other.records);
        self.stats.merge(&other.stats);
        self
    }
}

/// Scores usage rows against a reference index
///
/// Holds only shared references to immutable state, so one scorer can be
/// used from many threads at once.
pub struct Scorer<'a, L: ReferenceLookup + ?Sized> {
    resolver: CandidateResolver<'a, L>,
    extractor: EvidenceExtractor<'a>,
    classifier: TierClassifier,
    rules: &'a ScoringRules,
}

impl<'a, L: ReferenceLookup + ?Sized> Scorer<'a, L> {
    /// Create a scorer
    ///
    /// `index` must have been built with `rules.normalizer()`.
    pub fn new(index: &'a L, rules: &'a ScoringRules) -> Self {
        Self {
            resolver: CandidateResolver::new(index),
            extractor: EvidenceExtractor::new(rules),
            classifier: TierClassifier::new(rules.min_title_len_for_bronze()),
            rules,
        }
    }

    /// Score one row
    ///
    /// Malformed rows are rejected. Any failure after validation yields a
    /// NoMatch record flagged UNSCORABLE_ROW instead of aborting the run.
    pub fn score_row(&self, ordinal: usize, row: &UsageRow) -> Result<EvidenceRecord, RowError> {
        row.validate()?;

        match panic::catch_unwind(AssertUnwindSafe(|| self.evaluate(ordinal, row))) {
            Ok(record) => Ok(record),
            Err(_) => {
                error!(
                    "Row {} ({}) could not be scored; emitting NoMatch",
                    ordinal, row.source_ref
                );
                Ok(EvidenceRecord {
                    ordinal,
                    source_ref: row.source_ref.clone(),
                    title_norm: String::new(),
                    match_tier: Tier::NoMatch,
                    evidence_flags: EvidenceFlags::new().with(EvidenceFlag::UnscorableRow),
                    ref_match_count: 0,
                    best_candidate: None,
                })
            }
        }
    }

    fn evaluate(&self, ordinal: usize, row: &UsageRow) -> EvidenceRecord {
        let view = RowView::new(row, self.rules.normalizer());
        let resolution = self.resolver.resolve(&view);
        let flags = self.extractor.extract(&view, &resolution);
        let decision = self.classifier.decide(flags, RowFacts::from(&view));

        debug!(
            "Row {} {:?}: {:?} path, {} candidates, flags [{}] -> {:?}",
            ordinal,
            view.title_norm,
            resolution.path,
            resolution.ref_match_count(),
            flags,
            decision
        );

        EvidenceRecord {
            ordinal,
            source_ref: row.source_ref.clone(),
            title_norm: view.title_norm.clone(),
            match_tier: decision.tier(),
            evidence_flags: flags,
            ref_match_count: resolution.ref_match_count(),
            best_candidate: resolution.best_candidate().map(|entry| entry.summary()),
        }
    }

    /// Score rows sequentially, with ordinals starting at `first_ordinal`
    pub fn score_batch_from(&self, first_ordinal: usize, rows: &[UsageRow]) -> ScoredBatch {
        let mut batch = ScoredBatch::default();
        for (offset, row) in rows.iter().enumerate() {
            let ordinal = first_ordinal + offset;
            match self.score_row(ordinal, row) {
                Ok(record) => {
                    if record.has_flag(EvidenceFlag::UnscorableRow) {
                        batch.stats.record_unscorable();
                    } else {
                        batch.stats.record_scored(record.match_tier);
                    }
                    batch.records.push(record);
                }
                Err(e) => {
                    warn!("Skipping row {}: {}", ordinal, e);
                    batch.stats.record_malformed();
                }
            }
        }
        batch
    }

    /// Score rows sequentially
    pub fn score_batch(&self, rows: &[UsageRow]) -> ScoredBatch {
        let batch = self.score_batch_from(0, rows);
        info!(
            "Scored {} rows: {} matched, {} skipped",
            batch.stats.rows_in,
            batch.stats.matched(),
            batch.stats.skipped_malformed
        );
        batch
    }
}

impl<'a, L: ReferenceLookup + Sync + ?Sized> Scorer<'a, L> {
    /// Score rows in parallel shards of `shard_size`
    ///
    /// Ordinals are input positions, so the records are identical to
    /// [`Scorer::score_batch`] whatever the shard size or thread count.
    pub fn score_sharded(&self, rows: &[UsageRow], shard_size: usize) -> ScoredBatch {
        let shard_size = shard_size.max(1);
        let mut batch = rows
            .par_chunks(shard_size)
            .enumerate()
            .map(|(shard, chunk)| self.score_batch_from(shard * shard_size, chunk))
            .reduce(ScoredBatch::default, ScoredBatch::merge);
        batch.records.sort_by_key(|record| record.ordinal);

        info!(
            "Scored {} rows in {} shards: {} matched, {} skipped",
            batch.stats.rows_in,
            rows.len().div_ceil(shard_size),
            batch.stats.matched(),
            batch.stats.skipped_malformed
        );
        batch
    }
}
