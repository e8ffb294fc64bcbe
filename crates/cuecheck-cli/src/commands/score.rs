//! Score command implementation.

use crate::cli::ScoreArgs;
use crate::config::{OutputFormat, RunConfig};
use crate::error::{CliError, Result};
use crate::io;
use crate::output::Formatter;
use cuecheck_aggregator::{Aggregate, AggregateReport};
use cuecheck_domain::{EvidenceRecord, ReferenceEntry};
use cuecheck_index::{IndexReport, ReferenceIndex};
use cuecheck_scorer::{Scorer, ScoringRules, ScoringStats};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Records file written to the output directory.
pub const RECORDS_FILE: &str = "records.jsonl";

/// Report file written to the output directory.
pub const REPORT_FILE: &str = "report.json";

/// Everything a score run produced.
#[derive(Debug)]
pub struct ScoreOutcome {
    /// Scoring counters
    pub stats: ScoringStats,
    /// Reference index build report
    pub index: IndexReport,
    /// Audit report
    pub report: AggregateReport,
    /// Path of the records file
    pub records_path: PathBuf,
    /// Path of the report file
    pub report_path: PathBuf,
}

#[derive(Serialize)]
struct RunReport<'a> {
    index: &'a IndexReport,
    scoring: &'a ScoringStats,
    aggregate: &'a AggregateReport,
}

impl ScoreOutcome {
    fn run_report(&self) -> RunReport<'_> {
        RunReport {
            index: &self.index,
            scoring: &self.stats,
            aggregate: &self.report,
        }
    }
}

/// Score the rows and write the records and report files.
pub fn run_score(args: &ScoreArgs) -> Result<ScoreOutcome> {
    if args.shard_size == 0 {
        return Err(CliError::InvalidInput("--shard-size must be greater than 0".to_string()));
    }

    let config = RunConfig::load(&args.config)?;
    let rules = ScoringRules::compile(&config.scoring)?;

    let entries: Vec<ReferenceEntry> = io::read_jsonl(&args.reference)?;
    let index = if args.strict_reference {
        ReferenceIndex::build_strict(entries, rules.normalizer())?
    } else {
        ReferenceIndex::build(entries, rules.normalizer())
    };

    let rows = io::read_rows(&args.rows)?;
    info!(
        "Scoring {} rows against {} catalog entries (shard size {})",
        rows.len(),
        index.entries().len(),
        args.shard_size
    );

    let scorer = Scorer::new(&index, &rules);
    let batch = scorer.score_sharded(&rows, args.shard_size);
    let report = Aggregate::from_records_sharded(&batch.records, args.shard_size)
        .finish(&config.aggregation);

    fs::create_dir_all(&args.out_dir)?;
    let records_path = args.out_dir.join(RECORDS_FILE);
    io::write_jsonl(&records_path, batch.records.iter().map(EvidenceRecord::to_flat))?;

    let outcome = ScoreOutcome {
        stats: batch.stats,
        index: index.report().clone(),
        report,
        records_path,
        report_path: args.out_dir.join(REPORT_FILE),
    };
    io::write_json(&outcome.report_path, &outcome.run_report())?;
    info!(
        "Wrote {} and {}",
        outcome.records_path.display(),
        outcome.report_path.display()
    );

    Ok(outcome)
}

/// Execute the score command.
pub fn execute_score(args: ScoreArgs, formatter: &Formatter) -> Result<()> {
    let outcome = run_score(&args)?;

    match formatter.format() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.run_report())?);
        }
        OutputFormat::Table => {
            println!("{}", formatter.format_stats(&outcome.stats)?);
            println!("{}", formatter.format_aggregate(&outcome.report)?);
            if !outcome.index.is_clean() {
                println!(
                    "{}",
                    formatter.warning(&format!(
                        "Reference catalog: {} entries excluded, {} identifiers dropped, {} collisions",
                        outcome.index.excluded.len(),
                        outcome.index.identifiers_dropped,
                        outcome.index.identifier_collisions
                    ))
                );
            }
            println!(
                "{}",
                formatter.success(&format!(
                    "Wrote {} and {}",
                    outcome.records_path.display(),
                    outcome.report_path.display()
                ))
            );
        }
    }

    Ok(())
}
