//! Command-line interface for bloq
//!
//! Argument parsing is done with clap's derive API. Values given on the
//! command line override those of a configuration file.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use bloq_query::ErrorMode;

/// bloq - run query function trees over message records
///
/// A query is a tree of registered functions and methods serialized as TOML
/// or JSON. Each input line is one record; one JSON result is written per
/// record.
#[derive(Parser, Debug)]
#[command(name = "bloq")]
#[command(author, version, about)]
#[command(after_help = "EXAMPLES:\n  \
    # Run a query over newline-delimited records\n  \
    bloq query.toml records.ndjson\n\n  \
    # Read records from stdin and define a variable\n  \
    cat records.ndjson | bloq query.toml --var env=prod\n\n  \
    # Show what a query reads without running it\n  \
    bloq query.toml --targets")]
pub struct Cli {
    /// Query file (TOML or JSON)
    #[arg(index = 1, value_name = "QUERY")]
    pub query: Option<PathBuf>,

    /// Input file of newline-delimited records (stdin if not specified)
    #[arg(index = 2, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Define a variable as NAME=VALUE; VALUE is parsed as JSON when possible
    #[arg(long = "var", value_name = "NAME=VALUE", action = clap::ArgAction::Append)]
    pub vars: Vec<String>,

    /// How failing records are handled
    #[arg(long, value_enum)]
    pub error_mode: Option<ErrorModeArg>,

    /// Print the query's target paths instead of executing it
    #[arg(long)]
    pub targets: bool,

    /// Print execution statistics to stderr
    #[arg(long)]
    pub stats: bool,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file to use
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List registered functions and methods, then exit
    #[arg(long)]
    pub list_functions: bool,
}

/// Error mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ErrorModeArg {
    /// Stop at the first failing record
    Strict,
    /// Keep going and report failures as warnings
    Collect,
    /// Keep going silently
    Ignore,
}

impl From<ErrorModeArg> for ErrorMode {
    fn from(mode: ErrorModeArg) -> Self {
        match mode {
            ErrorModeArg::Strict => ErrorMode::Strict,
            ErrorModeArg::Collect => ErrorMode::Collect,
            ErrorModeArg::Ignore => ErrorMode::Ignore,
        }
    }
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Split a `NAME=VALUE` variable definition
pub fn parse_var(raw: &str) -> Option<(&str, &str)> {
    let (name, value) = raw.split_once('=')?;
    if name.is_empty() {
        return None;
    }
    Some((name, value))
}
