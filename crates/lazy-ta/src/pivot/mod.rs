//! Pivot detection.

pub mod zigzag;

use serde::{Deserialize, Serialize};

use lazy_ta_core::store::Bar;
use lazy_ta_core::SeriesElement;

pub use zigzag::{ZigZag, ZigZagEvent, ZigZagState};

/// The part of a bar pivot detection reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotBar<T> {
    /// Bar open time.
    pub time: i64,
    /// Bar high.
    pub high: T,
    /// Bar low.
    pub low: T,
    /// Bar volume, zero when the feed has none.
    pub volume: T,
}

impl<T: SeriesElement> PivotBar<T> {
    /// Converts a stored bar, treating missing volume as zero.
    ///
    /// Values that do not fit `T` become `NaN`.
    #[must_use]
    pub fn from_bar(bar: &Bar) -> Self {
        let cast = |v: f64| T::from_f64(v).unwrap_or_else(|_| T::nan());
        Self {
            time: bar.time,
            high: cast(bar.high),
            low: cast(bar.low),
            volume: cast(bar.volume_or_zero()),
        }
    }
}

/// A price at a bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint<T> {
    /// Bar open time.
    pub time: i64,
    /// Zero-based bar position.
    pub bar_index: usize,
    /// Price at that bar.
    pub price: T,
}

/// A confirmed swing: a line from the previous pivot's end to this one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pivot<T> {
    /// `true` for a swing high.
    pub is_high: bool,
    /// Volume traded while the swing formed.
    pub volume: T,
    /// Where the swing begins.
    pub start: ChartPoint<T>,
    /// The extreme that confirmed it.
    pub end: ChartPoint<T>,
}

impl<T: SeriesElement> Pivot<T> {
    /// Price move from `start` to `end`.
    #[must_use]
    pub fn price_change(&self) -> T {
        self.end.price - self.start.price
    }

    /// Bars between `start` and `end`.
    #[must_use]
    pub const fn bar_span(&self) -> usize {
        self.end.bar_index.saturating_sub(self.start.bar_index)
    }
}
