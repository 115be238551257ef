//! Writing indicator plots as CSV.
//!
//! [`CsvPlotSink`] is a [`PlotSink`]: a publisher fills it like a chart, and
//! [`CsvPlotSink::write_to`] then lays the series out as columns:
//!
//! ```text
//! time,<plot ids...>
//! ```
//!
//! One row per input bar. Undefined (`NaN`) values are written as empty
//! cells.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use csv::WriterBuilder;
use lazy_ta::prelude::{PlotPoint, PlotSink};

use crate::error::{CliError, Result};

/// Output destination: stdout or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDest {
    /// Write to stdout.
    Stdout,
    /// Write to the file at the given path.
    File(String),
}

impl OutputDest {
    /// `File` for `Some(path)`, `Stdout` otherwise.
    #[must_use]
    pub fn from_option(path: Option<&str>) -> Self {
        path.map_or(Self::Stdout, |p| Self::File(p.to_string()))
    }

    /// Opens a writer for this destination.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Io` if the file cannot be created.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(io::stdout().lock())),
            Self::File(path) => {
                let file = File::create(path).map_err(|e| CliError::io(e, path))?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Collects plot series in memory for CSV output.
#[derive(Debug, Default, Clone)]
pub struct CsvPlotSink {
    columns: Vec<(String, Vec<PlotPoint>)>,
}

impl CsvPlotSink {
    /// An empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Column ids in output order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(id, _)| id.as_str())
    }

    fn column_mut(&mut self, id: &str) -> Option<&mut Vec<PlotPoint>> {
        self.columns
            .iter_mut()
            .find(|(name, _)| name == id)
            .map(|(_, points)| points)
    }

    /// Writes the collected columns to `writer`.
    ///
    /// Rows follow the longest column; shorter columns pad with empty cells.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Io` if writing fails.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = WriterBuilder::new().from_writer(writer);
        let mut header = vec!["time"];
        header.extend(self.ids());
        out.write_record(&header)?;

        let rows = self.columns.iter().map(|(_, p)| p.len()).max().unwrap_or(0);
        for row in 0..rows {
            let time = self
                .columns
                .iter()
                .find_map(|(_, points)| points.get(row))
                .map_or_else(String::new, |p| p.time.to_string());
            let mut record = Vec::with_capacity(self.columns.len() + 1);
            record.push(time);
            for (_, points) in &self.columns {
                record.push(points.get(row).map_or_else(String::new, |p| format_value(p.value)));
            }
            out.write_record(&record)?;
        }
        out.flush()?;
        log::debug!("wrote {rows} rows, {} plots", self.columns.len());
        Ok(())
    }

    /// Writes the collected columns to `dest`.
    ///
    /// # Errors
    ///
    /// As [`OutputDest::writer`] and [`CsvPlotSink::write_to`].
    pub fn write(&self, dest: &OutputDest) -> Result<()> {
        self.write_to(dest.writer()?)
    }
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

impl PlotSink for CsvPlotSink {
    fn add_series(&mut self, id: &str) {
        if self.column_mut(id).is_none() {
            self.columns.push((id.to_string(), Vec::new()));
        }
    }

    fn remove_series(&mut self, id: &str) {
        self.columns.retain(|(name, _)| name != id);
    }

    fn set_data(&mut self, id: &str, points: &[PlotPoint]) {
        match self.column_mut(id) {
            Some(column) => *column = points.to_vec(),
            None => log::warn!("data for unknown series {id} ignored"),
        }
    }
}
