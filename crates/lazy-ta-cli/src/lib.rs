//! lazy-ta CLI library
//!
//! The pieces behind the `lazy-ta` binary, exposed for testing and reuse:
//! argument parsing, the CSV bar reader, the CSV plot sink and
//! [`execute`], which runs one parsed command against a [`Registry`].

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod args;
pub mod csv_parser;
pub mod csv_writer;
pub mod error;

use std::io::Write;

use lazy_ta::prelude::{PlotPublisher, Registry};
use serde_json::json;

pub use args::{Args, Command};
pub use csv_writer::{CsvPlotSink, OutputDest};
pub use error::{CliError, Result};

/// Runs `command`, writing anything bound for stdout to `stdout`.
///
/// # Errors
///
/// Returns the first error of argument checking, CSV reading, the
/// indicator run or output writing.
pub fn execute<W: Write>(command: &Command, registry: &Registry, stdout: &mut W) -> Result<()> {
    match command {
        Command::Run {
            indicator,
            input,
            set,
            output,
        } => {
            let overrides = args::parse_sets(set)?;
            let bars = csv_parser::parse_bars(input)?;
            if bars.is_empty() {
                return Err(lazy_ta::Error::EmptyInput.into());
            }
            let result = registry.calculate(indicator, &bars, overrides)?;

            let mut publisher = PlotPublisher::new();
            publisher.attach(CsvPlotSink::new());
            publisher.publish(&result)?;
            if let Some(sink) = publisher.detach() {
                match output {
                    Some(path) => sink.write(&OutputDest::File(path.clone()))?,
                    None => sink.write_to(&mut *stdout)?,
                }
            }
            log::info!("{indicator}: {} plots over {} bars", result.plots.len(), bars.len());
            Ok(())
        }
        Command::List => {
            for name in registry.names() {
                let indicator = registry.get(name)?;
                writeln!(stdout, "{name}\t{}", indicator.title())?;
            }
            Ok(())
        }
        Command::Describe { indicator } => {
            let found = registry.get(indicator)?;
            let inputs = serde_json::to_value(found.inputs())?;
            let schema = json!({
                "name": found.name(),
                "title": found.title(),
                "inputs": inputs,
            });
            serde_json::to_writer_pretty(&mut *stdout, &schema)?;
            writeln!(stdout)?;
            Ok(())
        }
    }
}
