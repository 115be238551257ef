//! Positional lookback helpers.

use crate::traits::SeriesElement;

/// Value `bars` positions back (`NaN` where that bar does not exist).
///
/// Indexing is by bar position, so `shift(x, 1)[i]` is exactly `x[i - 1]`.
#[must_use]
pub fn shift<T: SeriesElement>(data: &[T], bars: usize) -> Vec<T> {
    (0..data.len())
        .map(|i| i.checked_sub(bars).map_or_else(T::nan, |j| data[j]))
        .collect()
}

/// Difference between the current value and the one `bars` positions back.
#[must_use]
pub fn change<T: SeriesElement>(data: &[T], bars: usize) -> Vec<T> {
    (0..data.len())
        .map(|i| i.checked_sub(bars).map_or_else(T::nan, |j| data[i] - data[j]))
        .collect()
}
