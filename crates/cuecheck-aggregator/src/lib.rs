//! Cuecheck Aggregator
//!
//! Folds the evidence records of a scoring run into audit artifacts.
//!
//! The aggregator provides:
//! - Tier counts
//! - Duplicate-usage groups (normalized title + identifier)
//! - Truth gaps: matched catalog entries with no ISRC/ISWC, and the gap rate
//! - The action sheet: every Gold record plus the top-ranked Silver records
//! - Suspects: Gold/Silver records without title or artist support
//! - Person evidence: NoMatch records that still carry artist overlap or
//!   identifier evidence, queued for manual review
//!
//! Partial aggregates from independent shards merge to the same report as a
//! single pass.
//!
//! # Examples
//!
//! ```
//! use cuecheck_aggregator::{Aggregate, AggregatorConfig};
//!
//! let left = Aggregate::new();
//! let right = Aggregate::new();
//! let report = left.merge(right).finish(&AggregatorConfig::default());
//! assert_eq!(report.records, 0);
//! assert_eq!(report.truth_gaps.rate, 0.0);
//! ```

#![warn(missing_docs)]

mod aggregate;
mod config;
pub mod report;

pub use aggregate::Aggregate;
pub use config::AggregatorConfig;
pub use report::{ActionSheet, AggregateReport, DedupGroup, DedupTable, TruthGap, TruthGapTable};
