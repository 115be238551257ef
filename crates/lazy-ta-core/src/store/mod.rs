//! Versioned bar storage.
//!
//! [`BarStore`] owns the ordered OHLCV sequence and a monotonically
//! increasing `version`. Every mutation bumps the version by exactly one and
//! reads never touch it, so any cached computation can detect staleness by
//! comparing the `(id, version)` pair it remembered with the store's current
//! one.
//!
//! # Example
//!
//! ```
//! use lazy_ta_core::store::{Bar, BarStore, Source};
//!
//! let mut store = BarStore::new();
//! store.append(Bar::new(1, 10.0, 12.0, 9.0, 11.0));
//! store.append(Bar::new(2, 11.0, 13.0, 10.0, 12.0).with_volume(500.0));
//! assert_eq!(store.version(), 2);
//!
//! let hl2 = store.extract(Source::Hl2);
//! assert_eq!(hl2, vec![10.5, 11.5]);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One OHLCV record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar timestamp; strictly increasing along a well-formed sequence.
    pub time: i64,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume, if the feed reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    /// Creates a bar without volume.
    #[must_use]
    pub const fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// Returns the bar with `volume` set.
    #[must_use]
    pub const fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Volume with an absent value read as zero.
    #[inline]
    #[must_use]
    pub fn volume_or_zero(&self) -> f64 {
        self.volume.unwrap_or(0.0)
    }

    /// Reads one derived field of this bar.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self, source: Source) -> f64 {
        match source {
            Source::Open => self.open,
            Source::High => self.high,
            Source::Low => self.low,
            Source::Close => self.close,
            Source::Volume => self.volume_or_zero(),
            Source::Time => self.time as f64,
            Source::Hl2 => (self.high + self.low) / 2.0,
            Source::Hlc3 => (self.high + self.low + self.close) / 3.0,
            Source::Ohlc4 => (self.open + self.high + self.low + self.close) / 4.0,
            Source::Hlcc4 => (self.high + self.low + 2.0 * self.close) / 4.0,
        }
    }
}

/// A per-bar field that can be extracted from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Lowest price.
    Low,
    /// Closing price.
    Close,
    /// Volume, absent read as zero.
    Volume,
    /// Timestamp as a float.
    Time,
    /// `(high + low) / 2`
    Hl2,
    /// `(high + low + close) / 3`
    Hlc3,
    /// `(open + high + low + close) / 4`
    Ohlc4,
    /// `(high + low + close + close) / 4`
    Hlcc4,
}

impl Source {
    /// Every source, in display order.
    pub const ALL: [Self; 10] = [
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::Volume,
        Self::Time,
        Self::Hl2,
        Self::Hlc3,
        Self::Ohlc4,
        Self::Hlcc4,
    ];

    /// Lowercase name used in configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
            Self::Time => "time",
            Self::Hl2 => "hl2",
            Self::Hlc3 => "hlc3",
            Self::Ohlc4 => "ohlc4",
            Self::Hlcc4 => "hlcc4",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|source| source.name() == lower)
            .ok_or_else(|| Error::InvalidInput {
                id: "source".to_string(),
                reason: format!("unknown source '{s}'"),
            })
    }
}

/// Process-unique identity of one [`BarStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(u64);

impl StoreId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store#{}", self.0)
    }
}

/// Ordered, versioned bar sequence.
///
/// The store is the single writer's view of the data. Readers never copy
/// it to check freshness: they compare [`BarStore::id`] and
/// [`BarStore::version`] with what they saw last.
#[derive(Debug)]
pub struct BarStore {
    id: StoreId,
    bars: Vec<Bar>,
    version: u64,
}

impl Default for BarStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BarStore {
    /// Creates an empty store at version 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: StoreId::next(),
            bars: Vec::new(),
            version: 0,
        }
    }

    /// Creates a store holding `bars`, at version 0.
    pub fn from_bars<I: IntoIterator<Item = Bar>>(bars: I) -> Self {
        Self {
            id: StoreId::next(),
            bars: bars.into_iter().collect(),
            version: 0,
        }
    }

    /// Identity of this store instance.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> StoreId {
        self.id
    }

    /// Current version.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Number of bars.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the store holds no bars.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bar at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Most recent bar.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Borrowed view of the committed bar sequence.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &[Bar] {
        &self.bars
    }

    /// Appends a bar and returns the new version.
    ///
    /// Ordering is the caller's invariant; a bar whose time does not advance
    /// past the previous one is logged and stored anyway.
    pub fn append(&mut self, bar: Bar) -> u64 {
        if let Some(prev) = self.bars.last() {
            if bar.time <= prev.time {
                log::warn!(
                    "{}: appended bar time {} does not advance past {}",
                    self.id,
                    bar.time,
                    prev.time
                );
            }
        }
        self.bars.push(bar);
        self.bump()
    }

    /// Replaces the bar at `index` and returns the new version.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` if `index >= len()`.
    pub fn overwrite(&mut self, index: usize, bar: Bar) -> Result<u64> {
        let len = self.bars.len();
        let slot = self.bars.get_mut(index).ok_or(Error::OutOfRange {
            operation: "overwrite",
            index,
            len,
        })?;
        *slot = bar;
        Ok(self.bump())
    }

    /// Removes and returns the most recent bar.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` if the store is empty.
    pub fn remove_last(&mut self) -> Result<Bar> {
        let bar = self.bars.pop().ok_or(Error::OutOfRange {
            operation: "remove_last",
            index: 0,
            len: 0,
        })?;
        self.bump();
        Ok(bar)
    }

    /// Bumps the version without touching the data and returns it.
    pub fn invalidate(&mut self) -> u64 {
        self.bump()
    }

    /// Dense column of `source`, aligned 1:1 with the bars.
    #[must_use]
    pub fn extract(&self, source: Source) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.value(source)).collect()
    }

    fn bump(&mut self) -> u64 {
        self.version += 1;
        log::trace!("{} now at version {}", self.id, self.version);
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, close: f64) -> Bar {
        Bar::new(time, close, close + 1.0, close - 1.0, close)
    }

    #[test]
    fn test_new_store_is_empty_at_version_zero() {
        let store = BarStore::new();
        assert!(store.is_empty());
        assert_eq!(store.version(), 0);
        assert!(store.last().is_none());
    }

    #[test]
    fn test_every_mutation_bumps_version_once() {
        let mut store = BarStore::new();
        assert_eq!(store.append(bar(1, 10.0)), 1);
        assert_eq!(store.append(bar(2, 11.0)), 2);
        assert_eq!(store.overwrite(0, bar(1, 9.0)).unwrap(), 3);
        assert_eq!(store.invalidate(), 4);
        let removed = store.remove_last().unwrap();
        assert!((removed.close - 11.0).abs() < f64::EPSILON);
        assert_eq!(store.version(), 5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reads_do_not_bump_version() {
        let store = BarStore::from_bars([bar(1, 10.0), bar(2, 11.0)]);
        let _ = store.snapshot();
        let _ = store.extract(Source::Close);
        let _ = store.get(1);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_overwrite_out_of_range() {
        let mut store = BarStore::from_bars([bar(1, 10.0)]);
        let err = store.overwrite(3, bar(4, 1.0)).unwrap_err();
        assert_eq!(
            err,
            Error::OutOfRange {
                operation: "overwrite",
                index: 3,
                len: 1
            }
        );
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_remove_last_on_empty_store() {
        let mut store = BarStore::new();
        assert!(matches!(
            store.remove_last(),
            Err(Error::OutOfRange {
                operation: "remove_last",
                ..
            })
        ));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_non_monotonic_append_is_accepted() {
        let mut store = BarStore::new();
        store.append(bar(5, 10.0));
        store.append(bar(5, 11.0));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_ids_are_unique() {
        assert_ne!(BarStore::new().id(), BarStore::new().id());
    }

    #[test]
    fn test_extract_derived_sources() {
        let b = Bar::new(7, 1.0, 4.0, 0.0, 3.0).with_volume(12.0);
        let store = BarStore::from_bars([b, Bar::new(8, 1.0, 2.0, 1.0, 1.5)]);
        assert_eq!(store.extract(Source::Hl2), vec![2.0, 1.5]);
        assert_eq!(store.extract(Source::Hlc3)[0], 7.0 / 3.0);
        assert_eq!(store.extract(Source::Ohlc4)[0], 2.0);
        assert_eq!(store.extract(Source::Hlcc4)[0], 2.5);
        assert_eq!(store.extract(Source::Volume), vec![12.0, 0.0]);
        assert_eq!(store.extract(Source::Time), vec![7.0, 8.0]);
    }

    #[test]
    fn test_source_from_str() {
        assert_eq!("close".parse::<Source>().unwrap(), Source::Close);
        assert_eq!(" HLC3 ".parse::<Source>().unwrap(), Source::Hlc3);
        assert!(matches!(
            "typical".parse::<Source>(),
            Err(Error::InvalidInput { .. })
        ));
        for source in Source::ALL {
            assert_eq!(source.name().parse::<Source>().unwrap(), source);
        }
    }

    #[test]
    fn test_bar_serde_defaults_volume() {
        let json = r#"{"time":1,"open":1.0,"high":2.0,"low":0.5,"close":1.5}"#;
        let bar: Bar = serde_json::from_str(json).unwrap();
        assert!(bar.volume.is_none());
        assert!((bar.volume_or_zero()).abs() < f64::EPSILON);

        let source: Source = serde_json::from_str("\"ohlc4\"").unwrap();
        assert_eq!(source, Source::Ohlc4);
    }
}
