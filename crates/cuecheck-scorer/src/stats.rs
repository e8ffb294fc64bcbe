//! Counters collected while scoring

use cuecheck_domain::Tier;
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics for one scoring run (or one shard of it)
///
/// Shards are merged by summing; merging is order-independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoringStats {
    /// Rows handed to the scorer
    pub rows_in: usize,

    /// Rows that produced a record (including unscorable ones)
    pub scored: usize,

    /// Rows rejected at the boundary (no record produced)
    pub skipped_malformed: usize,

    /// Rows that failed during scoring and were emitted as NoMatch
    pub unscorable: usize,

    /// Records per tier
    pub tiers: BTreeMap<Tier, usize>,
}

impl ScoringStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a produced record
    pub fn record_scored(&mut self, tier: Tier) {
        self.rows_in += 1;
        self.scored += 1;
        *self.tiers.entry(tier).or_insert(0) += 1;
    }

    /// Record a row that failed during scoring
    pub fn record_unscorable(&mut self) {
        self.record_scored(Tier::NoMatch);
        self.unscorable += 1;
    }

    /// Record a rejected row
    pub fn record_malformed(&mut self) {
        self.rows_in += 1;
        self.skipped_malformed += 1;
    }

    /// Records assigned `tier`
    pub fn tier_count(&self, tier: Tier) -> usize {
        self.tiers.get(&tier).copied().unwrap_or(0)
    }

    /// Records with a matching tier
    pub fn matched(&self) -> usize {
        self.tiers
            .iter()
            .filter(|(tier, _)| tier.is_match())
            .map(|(_, count)| count)
            .sum()
    }

    /// Fold another shard's statistics into these
    pub fn merge(&mut self, other: &ScoringStats) {
        self.rows_in += other.rows_in;
        self.scored += other.scored;
        self.skipped_malformed += other.skipped_malformed;
        self.unscorable += other.unscorable;
        for (tier, count) in &other.tiers {
            *self.tiers.entry(*tier).or_insert(0) += count;
        }
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Scoring Summary".to_string(),
            "===============".to_string(),
            format!("Rows read: {}", self.rows_in),
            format!("Scored: {}", self.scored),
            format!("Skipped (malformed): {}", self.skipped_malformed),
            format!("Unscorable: {}", self.unscorable),
            String::new(),
            "Records by tier:".to_string(),
        ];
        for tier in Tier::ALL {
            lines.push(format!("  {}: {}", tier, self.tier_count(tier)));
        }
        lines.push(format!("  Matched: {}", self.matched()));
        lines.join("\n")
    }
}
