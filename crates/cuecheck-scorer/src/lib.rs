//! Cuecheck Scorer
//!
//! Decides, for each usage-report row, whether it refers to an owned catalog
//! entry and how confidently.
//!
//! The scorer provides:
//! - Candidate resolution (identifiers first, then normalized title)
//! - Evidence extraction (independent boolean flags per row)
//! - Tier classification (a pure function of the flags)
//! - Sequential and shard-parallel batch scoring
//!
//! # Examples
//!
//! ```
//! use cuecheck_domain::{ReferenceEntry, Tier, UsageRow};
//! use cuecheck_index::ReferenceIndex;
//! use cuecheck_scorer::{Scorer, ScoringConfig, ScoringRules};
//!
//! let rules = ScoringRules::compile(&ScoringConfig::new(8)).unwrap();
//! let index = ReferenceIndex::build(
//!     vec![ReferenceEntry::new(1, "Eleanor Rigby").with_evidence_tokens(["Beatles"])],
//!     rules.normalizer(),
//! );
//! let scorer = Scorer::new(&index, &rules);
//!
//! let row = UsageRow::new("ELEANOR RIGBY", "report.xlsx#1").with_artist("The Beatles");
//! let record = scorer.score_row(0, &row).unwrap();
//! assert_eq!(record.match_tier, Tier::Silver);
//! ```

#![warn(missing_docs)]

pub mod classifier;
mod config;
mod error;
pub mod evidence;
pub mod resolver;
mod rules;
mod scorer;
mod stats;

pub use classifier::{Decision, RowFacts, TierClassifier};
pub use config::{OwnedException, ScoringConfig, TitleTrigger, REQUIRED_KEYS};
pub use error::ConfigError;
pub use evidence::EvidenceExtractor;
pub use resolver::{CandidateResolver, Resolution, ResolutionPath, RowView};
pub use rules::{CompiledException, ScoringRules};
pub use scorer::{ScoredBatch, Scorer};
pub use stats::ScoringStats;
