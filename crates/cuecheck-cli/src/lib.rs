//! Cuecheck CLI library.
//!
//! This library provides the pieces behind the `cuecheck` binary: argument
//! parsing, run configuration loading, JSON Lines I/O, command execution and
//! output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod io;
pub mod output;

pub use cli::{Cli, Command};
pub use config::{OutputFormat, RunConfig};
pub use error::{CliError, Result};
pub use output::Formatter;
