//! Reading bars from CSV.
//!
//! Columns are matched by header, case-insensitively:
//!
//! - `time`, `timestamp` or `date`: integer bar time (optional; the row
//!   number is used when absent)
//! - `open`, `high`, `low`, `close`: prices (required)
//! - `volume` or `vol`: traded volume (optional)
//!
//! Empty price cells read as `NaN`; an empty volume cell reads as absent.
//! Other columns are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use lazy_ta::prelude::Bar;

use crate::error::{CliError, Result};

/// Column positions of one CSV layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    /// Time column, if present.
    pub time: Option<usize>,
    /// Open column.
    pub open: usize,
    /// High column.
    pub high: usize,
    /// Low column.
    pub low: usize,
    /// Close column.
    pub close: usize,
    /// Volume column, if present.
    pub volume: Option<usize>,
}

impl ColumnMap {
    /// Locates the bar columns in `headers`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CsvParse` naming the first missing price column.
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let require = |name: &str| {
            find(&[name]).ok_or_else(|| CliError::csv(format!("no '{name}' column found"), Some(1)))
        };
        Ok(Self {
            time: find(&["time", "timestamp", "date"]),
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find(&["volume", "vol"]),
        })
    }
}

/// Parses a price cell, an empty cell being `NaN`.
fn parse_price(cell: &str, column: &str, line: usize) -> Result<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| CliError::csv(format!("cannot parse {column} '{trimmed}' as number"), Some(line)))
}

/// Parses a bar from one record.
fn parse_record(record: &StringRecord, columns: &ColumnMap, row: usize, line: usize) -> Result<Bar> {
    let cell = |idx: usize| record.get(idx).unwrap_or("");
    let time = match columns.time {
        Some(idx) => {
            let raw = cell(idx).trim();
            raw.parse::<i64>().map_err(|_| {
                CliError::csv(format!("cannot parse time '{raw}' as integer"), Some(line))
            })?
        }
        None => i64::try_from(row)
            .map_err(|_| CliError::csv("too many rows", Some(line)))?,
    };
    let mut bar = Bar::new(
        time,
        parse_price(cell(columns.open), "open", line)?,
        parse_price(cell(columns.high), "high", line)?,
        parse_price(cell(columns.low), "low", line)?,
        parse_price(cell(columns.close), "close", line)?,
    );
    if let Some(idx) = columns.volume {
        let raw = cell(idx).trim();
        if !raw.is_empty() {
            bar = bar.with_volume(parse_price(raw, "volume", line)?);
        }
    }
    Ok(bar)
}

/// Reads bars from the CSV file at `path`.
///
/// # Errors
///
/// Returns `CliError::Io` if the file cannot be opened and
/// `CliError::CsvParse` for malformed content.
pub fn parse_bars<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CliError::io(e, &path.display().to_string()))?;
    parse_bars_from_reader(BufReader::new(file))
}

/// Reads bars from any CSV source.
///
/// # Errors
///
/// Returns `CliError::CsvParse` for malformed content.
pub fn parse_bars_from_reader<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| CliError::csv(e.to_string(), Some(1)))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;
    log::debug!("csv columns: {columns:?}");

    let mut bars: Vec<Bar> = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        // header is line 1
        let line = row + 2;
        let record = record.map_err(|e| CliError::csv(e.to_string(), Some(line)))?;
        let bar = parse_record(&record, &columns, row, line)?;
        if let Some(prev) = bars.last() {
            if bar.time <= prev.time {
                log::warn!("line {line}: time {} does not advance past {}", bar.time, prev.time);
            }
        }
        bars.push(bar);
    }
    log::info!("read {} bars", bars.len());
    Ok(bars)
}
