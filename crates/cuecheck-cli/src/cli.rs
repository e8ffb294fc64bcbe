//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default number of rows per scoring shard.
pub const DEFAULT_SHARD_SIZE: usize = 5_000;

/// Cuecheck - Match usage-report rows against an owned catalog.
#[derive(Debug, Parser)]
#[command(name = "cuecheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log per-row decisions (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score usage rows and write records plus the audit report
    Score(ScoreArgs),

    /// Check a configuration and, optionally, a reference catalog
    Validate(ValidateArgs),

    /// Rebuild the audit report from a records file
    Aggregate(AggregateArgs),
}

/// Arguments for the score command.
#[derive(Debug, Clone, Parser)]
pub struct ScoreArgs {
    /// Reference catalog (JSON Lines, one entry per line)
    #[arg(short, long, env = "CUECHECK_REFERENCE")]
    pub reference: PathBuf,

    /// Usage rows (JSON Lines, one row per line)
    #[arg(long)]
    pub rows: PathBuf,

    /// Run configuration (TOML with [scoring] and optional [aggregation])
    #[arg(short, long, env = "CUECHECK_CONFIG")]
    pub config: PathBuf,

    /// Directory receiving records.jsonl and report.json
    #[arg(short, long)]
    pub out_dir: PathBuf,

    /// Rows per parallel shard
    #[arg(long, default_value_t = DEFAULT_SHARD_SIZE)]
    pub shard_size: usize,

    /// Fail if any catalog entry is refused
    #[arg(long)]
    pub strict_reference: bool,
}

/// Arguments for the validate command.
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Run configuration (TOML)
    #[arg(short, long, env = "CUECHECK_CONFIG")]
    pub config: PathBuf,

    /// Reference catalog to check (JSON Lines)
    #[arg(short, long)]
    pub reference: Option<PathBuf>,

    /// Fail if any catalog entry is refused
    #[arg(long)]
    pub strict_reference: bool,
}

/// Arguments for the aggregate command.
#[derive(Debug, Clone, Parser)]
pub struct AggregateArgs {
    /// Records file written by `score` (JSON Lines)
    pub records: PathBuf,

    /// Run configuration; only [aggregation] is read
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the report as JSON to this path
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}
