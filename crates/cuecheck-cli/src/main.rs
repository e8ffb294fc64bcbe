//! Cuecheck CLI - Match usage-report rows against an owned catalog.

use clap::Parser;
use cuecheck_cli::commands;
use cuecheck_cli::{Cli, Command, Formatter, OutputFormat};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.format.map(Into::into).unwrap_or(OutputFormat::Table);
    let formatter = Formatter::new(format, !cli.no_color);

    if let Err(e) = run(cli.command, &formatter) {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

fn run(command: Command, formatter: &Formatter) -> cuecheck_cli::Result<()> {
    match command {
        Command::Score(args) => commands::execute_score(args, formatter),
        Command::Validate(args) => commands::execute_validate(args, formatter),
        Command::Aggregate(args) => commands::execute_aggregate(args, formatter),
    }
}

/// Log to stderr; `--verbose` forces debug, otherwise RUST_LOG or info.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
