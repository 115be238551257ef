//! Command-line arguments.
//!
//! ```bash
//! # Bollinger Bands with default inputs, to stdout
//! lazy-ta run bollinger bars.csv
//!
//! # Zig-zag with overridden inputs, to a file
//! lazy-ta run zigzag bars.csv -s deviation=3 -s depth=6 -o pivots.csv
//!
//! # What is available, and how it is configured
//! lazy-ta list
//! lazy-ta describe supertrend
//! ```

use clap::{Parser, Subcommand};

use crate::error::{CliError, Result};

/// lazy-ta: lazily evaluated technical indicators over CSV bars
#[derive(Parser, Debug)]
#[command(name = "lazy-ta")]
#[command(author, version, about = "Lazily evaluated technical analysis indicators")]
#[command(long_about = "lazy-ta reads OHLCV bars from a CSV file, runs one registered \
    indicator over them and writes every plot as a CSV column, one row per bar.")]
pub struct Args {
    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run an indicator over a bar file
    Run {
        /// Registered indicator name (see `lazy-ta list`)
        indicator: String,

        /// Input CSV with open, high, low, close and optional time, volume
        input: String,

        /// Input override, repeatable (e.g. -s length=20)
        #[arg(short = 's', long = "set", value_name = "ID=VALUE")]
        set: Vec<String>,

        /// Output CSV file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the registered indicators
    List,

    /// Print an indicator's input schema as JSON
    Describe {
        /// Registered indicator name
        indicator: String,
    },
}

impl Args {
    /// Parses the process arguments, exiting on `--help` or misuse.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Splits an `id=value` override.
///
/// Only the first `=` separates; the value may contain more.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` if there is no `=` or the id is empty.
pub fn parse_set(raw: &str) -> Result<(String, String)> {
    let invalid = |reason: &str| CliError::InvalidArgument {
        argument: raw.to_string(),
        reason: reason.to_string(),
        suggestion: Some("Use -s id=value (e.g. -s length=20)".to_string()),
    };
    let (id, value) = raw.split_once('=').ok_or_else(|| invalid("expected id=value"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(invalid("input id is empty"));
    }
    Ok((id.to_string(), value.trim().to_string()))
}

/// Parses every override of a `run`.
///
/// # Errors
///
/// As [`parse_set`].
pub fn parse_sets(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter().map(|s| parse_set(s)).collect()
}
