//! True range and average true range.
//!
//! ```text
//! TR[0] = high - low
//! TR[i] = max(high - low, |high - close[i-1]|, |low - close[i-1]|)
//! ATR   = RMA(TR, period)
//! ```
//!
//! When the previous close is missing the bar falls back to `high - low`.

use crate::error::Result;
use crate::kernels::smoothing::rma;
use crate::traits::{validate_same_length, SeriesElement};

/// True range of every bar.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` if the three columns differ in length.
pub fn true_range<T: SeriesElement>(high: &[T], low: &[T], close: &[T]) -> Result<Vec<T>> {
    validate_same_length(&[
        ("high", high.len()),
        ("low", low.len()),
        ("close", close.len()),
    ])?;
    let mut out = Vec::with_capacity(high.len());
    for i in 0..high.len() {
        let (h, l) = (high[i], low[i]);
        let range = h - l;
        let prev_close = if i == 0 { T::nan() } else { close[i - 1] };
        // Float::max ignores NaN, so propagate it explicitly
        let tr = if h.is_nan() || l.is_nan() {
            T::nan()
        } else if prev_close.is_nan() {
            range
        } else {
            range
                .max((h - prev_close).abs())
                .max((l - prev_close).abs())
        };
        out.push(tr);
    }
    Ok(out)
}

/// Average true range, Wilder-smoothed.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero and
/// `Error::LengthMismatch` if the three columns differ in length.
pub fn atr<T: SeriesElement>(high: &[T], low: &[T], close: &[T], period: usize) -> Result<Vec<T>> {
    rma(&true_range(high, low, close)?, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_true_range_uses_previous_close() {
        let high = [10.0_f64, 12.0, 11.0];
        let low = [8.0_f64, 11.0, 7.0];
        let close = [9.0_f64, 11.5, 8.0];
        let tr = true_range(&high, &low, &close).unwrap();
        assert_eq!(tr, vec![2.0, 3.0, 4.5]);
    }

    #[test]
    fn test_atr_warm_up() {
        let high = [10.0_f64, 12.0, 11.0, 13.0];
        let low = [8.0_f64, 11.0, 7.0, 12.0];
        let close = [9.0_f64, 11.5, 8.0, 12.5];
        let out = atr(&high, &low, &close, 3).unwrap();
        assert!(out[1].is_nan());
        assert!((out[2] - 9.5 / 3.0).abs() < 1e-12);
        let expected = (9.5 / 3.0 * 2.0 + 5.0) / 3.0;
        assert!((out[3] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            true_range(&[1.0_f64], &[1.0, 2.0], &[1.0]),
            Err(Error::LengthMismatch { .. })
        ));
    }
}
