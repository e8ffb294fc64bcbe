//! Aggregate command implementation.

use crate::cli::AggregateArgs;
use crate::config::RunConfig;
use crate::error::{CliError, Result};
use crate::io;
use crate::output::Formatter;
use cuecheck_aggregator::{Aggregate, AggregateReport, AggregatorConfig};
use cuecheck_domain::{EvidenceRecord, FlatRecord};
use std::collections::BTreeSet;

/// Rebuild the audit report from a records file.
pub fn run_aggregate(args: &AggregateArgs) -> Result<AggregateReport> {
    let config = match &args.config {
        Some(path) => RunConfig::load_aggregation(path)?,
        None => AggregatorConfig::default(),
    };

    let flat: Vec<FlatRecord> = io::read_jsonl(&args.records)?;
    let records = flat
        .into_iter()
        .map(EvidenceRecord::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    ensure_unique(&records)?;

    let report = Aggregate::from_records(&records).finish(&config);
    if let Some(out) = &args.out {
        io::write_json(out, &report)?;
    }
    Ok(report)
}

/// Records of several runs may be concatenated, but a record given twice
/// would be counted twice in the tier totals and once everywhere else.
fn ensure_unique(records: &[EvidenceRecord]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for record in records {
        if !seen.insert((record.ordinal, record.source_ref.as_str())) {
            return Err(CliError::DuplicateRecord {
                ordinal: record.ordinal,
                source_ref: record.source_ref.clone(),
            });
        }
    }
    Ok(())
}

/// Execute the aggregate command.
pub fn execute_aggregate(args: AggregateArgs, formatter: &Formatter) -> Result<()> {
    let report = run_aggregate(&args)?;
    println!("{}", formatter.format_aggregate(&report)?);
    if let Some(out) = &args.out {
        println!("{}", formatter.success(&format!("Wrote {}", out.display())));
    }
    Ok(())
}
