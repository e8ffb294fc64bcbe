//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::config::RunConfig;
use crate::error::Result;
use crate::io;
use crate::output::Formatter;
use cuecheck_domain::ReferenceEntry;
use cuecheck_index::{IndexReport, ReferenceIndex};
use cuecheck_scorer::ScoringRules;

/// What validation checked.
#[derive(Debug)]
pub struct ValidateOutcome {
    /// Loaded configuration
    pub config: RunConfig,
    /// Index report, when a catalog was given
    pub index: Option<IndexReport>,
}

/// Load the configuration and optionally build the reference index.
pub fn run_validate(args: &ValidateArgs) -> Result<ValidateOutcome> {
    let config = RunConfig::load(&args.config)?;
    let rules = ScoringRules::compile(&config.scoring)?;

    let index = match &args.reference {
        Some(path) => {
            let entries: Vec<ReferenceEntry> = io::read_jsonl(path)?;
            let index = if args.strict_reference {
                ReferenceIndex::build_strict(entries, rules.normalizer())?
            } else {
                ReferenceIndex::build(entries, rules.normalizer())
            };
            Some(index.report().clone())
        }
        None => None,
    };

    Ok(ValidateOutcome { config, index })
}

/// Execute the validate command.
pub fn execute_validate(args: ValidateArgs, formatter: &Formatter) -> Result<()> {
    let outcome = run_validate(&args)?;
    let scoring = &outcome.config.scoring;

    println!(
        "{}",
        formatter.success(&format!(
            "Configuration is valid: {} gold tokens, {} negative triggers, {} deny tokens, {} owned exceptions",
            scoring.gold_tokens.len(),
            scoring.negative_title_triggers.len(),
            scoring.deny_tokens.len(),
            scoring.owned_exceptions.len()
        ))
    );

    if let Some(report) = &outcome.index {
        println!("{}", formatter.format_index_report(report)?);
    }

    Ok(())
}
