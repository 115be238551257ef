//! Rolling extrema using a monotonic deque.
//!
//! The deque holds indices whose values are monotonically ordered
//! (decreasing for max, increasing for min), so the front is always the
//! extremum of the current window. Each index enters and leaves once, giving
//! O(n) total work instead of O(n * period).
//!
//! On equal values the most recent bar wins: a push evicts every queued
//! index whose value is `<=` (max) or `>=` (min) the new one. This decides
//! the offset reported by [`highest_bars`] and [`lowest_bars`].
//!
//! # Example
//!
//! ```
//! use lazy_ta_core::kernels::rolling_extrema::{highest, highest_bars};
//!
//! let data = [3.0_f64, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
//! let max = highest(&data, 3).unwrap();
//! assert!((max[2] - 4.0).abs() < 1e-10);
//! assert!((max[7] - 9.0).abs() < 1e-10);
//!
//! let offset = highest_bars(&data, 3).unwrap();
//! assert!((offset[7] + 2.0).abs() < 1e-10); // the 9 sits two bars back
//! ```

use std::collections::VecDeque;

use crate::error::Result;
use crate::traits::{validate_period, SeriesElement};

/// Which extremum the deque tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    /// Rolling maximum.
    Max,
    /// Rolling minimum.
    Min,
}

impl Extremum {
    /// Whether `incoming` displaces a queued `queued` value.
    #[inline]
    fn displaces<T: SeriesElement>(self, incoming: T, queued: T) -> bool {
        match self {
            Self::Max => incoming >= queued,
            Self::Min => incoming <= queued,
        }
    }
}

/// A monotonic deque of indices over a fixed-length window.
#[derive(Debug, Clone)]
pub struct MonotonicDeque {
    deque: VecDeque<usize>,
    period: usize,
    kind: Extremum,
}

impl MonotonicDeque {
    /// Creates an empty deque for a window of `period` bars.
    #[must_use]
    pub fn new(period: usize, kind: Extremum) -> Self {
        Self {
            deque: VecDeque::with_capacity(period),
            period,
            kind,
        }
    }

    /// Drops every queued index.
    #[inline]
    pub fn clear(&mut self) {
        self.deque.clear();
    }

    /// Pushes `data[index]` and evicts indices that left the window.
    ///
    /// `index` must be in bounds and increase between calls.
    #[inline]
    pub fn push<T: SeriesElement>(&mut self, index: usize, data: &[T]) {
        let value = data[index];
        while let Some(&back) = self.deque.back() {
            if self.kind.displaces(value, data[back]) {
                self.deque.pop_back();
            } else {
                break;
            }
        }
        self.deque.push_back(index);

        if index >= self.period {
            let window_start = index + 1 - self.period;
            while let Some(&front) = self.deque.front() {
                if front < window_start {
                    self.deque.pop_front();
                } else {
                    break;
                }
            }
        }
    }

    /// Index of the current extremum.
    #[inline]
    #[must_use]
    pub fn front_index(&self) -> Option<usize> {
        self.deque.front().copied()
    }
}

/// Walks `data` once, calling `emit(i, front)` with the extremum index of
/// every defined window and `None` otherwise.
fn scan<T: SeriesElement>(
    data: &[T],
    period: usize,
    kind: Extremum,
    mut emit: impl FnMut(usize, Option<usize>) -> T,
) -> Result<Vec<T>> {
    validate_period(period)?;
    let mut deque = MonotonicDeque::new(period, kind);
    let mut run = 0_usize;
    let mut out = Vec::with_capacity(data.len());

    for (i, x) in data.iter().enumerate() {
        if x.is_nan() {
            deque.clear();
            run = 0;
            out.push(emit(i, None));
            continue;
        }
        run += 1;
        deque.push(i, data);
        let front = if run >= period { deque.front_index() } else { None };
        out.push(emit(i, front));
    }
    Ok(out)
}

/// Signed bar offset from `i` back to `front`, as a non-positive number.
#[inline]
fn offset_of<T: SeriesElement>(i: usize, front: usize) -> T {
    T::from_usize(i - front).map_or_else(|_| T::nan(), |back| -back)
}

/// Highest value over a trailing window.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn highest<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    scan(data, period, Extremum::Max, |_, front| {
        front.map_or_else(T::nan, |f| data[f])
    })
}

/// Lowest value over a trailing window.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn lowest<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    scan(data, period, Extremum::Min, |_, front| {
        front.map_or_else(T::nan, |f| data[f])
    })
}

/// Offset to the highest value of the trailing window (`0` = current bar,
/// `-1` = one bar back, ...).
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn highest_bars<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    scan(data, period, Extremum::Max, |i, front| {
        front.map_or_else(T::nan, |f| offset_of(i, f))
    })
}

/// Offset to the lowest value of the trailing window.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn lowest_bars<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    scan(data, period, Extremum::Min, |i, front| {
        front.map_or_else(T::nan, |f| offset_of(i, f))
    })
}

/// O(n * period) reference for [`highest`] and [`lowest`], with the same
/// warm-up and tie rules. Kept for cross-checking.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn extremum_naive<T: SeriesElement>(data: &[T], period: usize, kind: Extremum) -> Result<Vec<T>> {
    Ok(extremum_index_naive(data, period, kind)?
        .into_iter()
        .map(|idx| idx.map_or_else(T::nan, |j| data[j]))
        .collect())
}

/// O(n * period) reference for [`highest_bars`] and [`lowest_bars`].
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn extremum_bars_naive<T: SeriesElement>(
    data: &[T],
    period: usize,
    kind: Extremum,
) -> Result<Vec<T>> {
    Ok(extremum_index_naive(data, period, kind)?
        .into_iter()
        .enumerate()
        .map(|(i, idx)| idx.map_or_else(T::nan, |j| offset_of(i, j)))
        .collect())
}

fn extremum_index_naive<T: SeriesElement>(
    data: &[T],
    period: usize,
    kind: Extremum,
) -> Result<Vec<Option<usize>>> {
    validate_period(period)?;
    Ok((0..data.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = i + 1 - period..=i;
            if data[window.clone()].iter().any(|x| x.is_nan()) {
                return None;
            }
            window.fold(None, |best: Option<usize>, j| match best {
                Some(b) if !kind.displaces(data[j], data[b]) => Some(b),
                _ => Some(j),
            })
        })
        .collect())
}
