//! Closed-form feedback smoothers and the weighted moving average.
//!
//! EMA and RMA share one recursion, `y = alpha * x + (1 - alpha) * y_prev`,
//! and differ only in alpha:
//!
//! ```text
//! EMA: alpha = 2 / (period + 1)
//! RMA: alpha = 1 / period        (Wilder smoothing)
//! ```
//!
//! The recursion is seeded with the simple average of the first complete
//! window, so the first `period - 1` outputs are `NaN`. A `NaN` input
//! produces `NaN` at that bar and drops the state: the next value only
//! appears once a fresh complete window has been seen.
//!
//! # Example
//!
//! ```
//! use lazy_ta_core::kernels::smoothing::{ema, rma};
//!
//! let data = [2.0_f64, 4.0, 6.0, 8.0];
//! let e = ema(&data, 3).unwrap();
//! assert!(e[1].is_nan());
//! assert!((e[2] - 4.0).abs() < 1e-12);  // seed: mean of 2, 4, 6
//! assert!((e[3] - 6.0).abs() < 1e-12);  // 0.5 * 8 + 0.5 * 4
//!
//! let r = rma(&data, 2).unwrap();
//! assert!((r[3] - 6.25).abs() < 1e-12);
//! ```

use crate::error::{Error, Result};
use crate::traits::{validate_period, SeriesElement};

/// Exponential moving average, `alpha = 2 / (period + 1)`.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn ema<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period(period)?;
    let alpha = T::two() / (T::from_usize(period)? + T::one());
    ema_with_alpha(data, period, alpha)
}

/// Wilder's moving average, `alpha = 1 / period`.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn rma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period(period)?;
    let alpha = T::one() / T::from_usize(period)?;
    ema_with_alpha(data, period, alpha)
}

/// Exponential smoothing with an explicit `alpha`, seeded by the SMA of the
/// first complete `period` window.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero and
/// `Error::InvalidParameter` unless `0 < alpha <= 1`.
pub fn ema_with_alpha<T: SeriesElement>(data: &[T], period: usize, alpha: T) -> Result<Vec<T>> {
    validate_period(period)?;
    if !(alpha > T::zero() && alpha <= T::one()) {
        return Err(Error::InvalidParameter {
            name: "alpha",
            reason: "must be in (0, 1]".to_string(),
        });
    }
    let period_t = T::from_usize(period)?;
    let decay = T::one() - alpha;

    let mut out = Vec::with_capacity(data.len());
    let mut prev: Option<T> = None;
    let mut seed_sum = T::zero();
    let mut seed_count = 0_usize;

    for &x in data {
        if x.is_nan() {
            prev = None;
            seed_sum = T::zero();
            seed_count = 0;
            out.push(T::nan());
            continue;
        }
        let value = match prev {
            Some(p) => alpha * x + decay * p,
            None => {
                seed_sum = seed_sum + x;
                seed_count += 1;
                if seed_count < period {
                    out.push(T::nan());
                    continue;
                }
                seed_sum / period_t
            }
        };
        prev = Some(value);
        out.push(value);
    }
    Ok(out)
}

/// Linearly weighted moving average; the newest bar weighs `period`, the
/// oldest `1`.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn wma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    validate_period(period)?;
    let period_t = T::from_usize(period)?;
    let denominator = period_t * (period_t + T::one()) / T::two();

    let mut out = Vec::with_capacity(data.len());
    let mut run = 0_usize;
    let mut sum = T::zero();
    let mut numerator = T::zero();

    for (i, &x) in data.iter().enumerate() {
        if x.is_nan() {
            run = 0;
            sum = T::zero();
            numerator = T::zero();
            out.push(T::nan());
            continue;
        }
        run += 1;
        if run <= period {
            numerator = numerator + T::from_usize(run)? * x;
            sum = sum + x;
        } else {
            // shift every weight down by one, then add the newest at full weight
            numerator = numerator - sum + period_t * x;
            sum = sum + x - data[i - period];
        }
        out.push(if run >= period {
            numerator / denominator
        } else {
            T::nan()
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ema_seed_and_recursion() {
        let out = ema(&[1.0_f64, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert!(out[0].is_nan() && out[1].is_nan());
        assert!(approx(out[2], 2.0));
        assert!(approx(out[3], 3.0));
        assert!(approx(out[4], 4.0));
    }

    #[test]
    fn test_rma_matches_wilder_recursion() {
        let data = [10.0_f64, 12.0, 11.0, 13.0, 15.0];
        let out = rma(&data, 3).unwrap();
        let seed = 11.0;
        let r3 = (seed * 2.0 + 13.0) / 3.0;
        let r4 = (r3 * 2.0 + 15.0) / 3.0;
        assert!(approx(out[2], seed));
        assert!(approx(out[3], r3));
        assert!(approx(out[4], r4));
    }

    #[test]
    fn test_nan_forces_reseed() {
        let data = [1.0_f64, 2.0, f64::NAN, 4.0, 6.0, 8.0];
        let out = ema(&data, 2).unwrap();
        assert!(approx(out[1], 1.5));
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
        assert!(approx(out[4], 5.0));
        assert!(approx(out[5], 8.0 * 2.0 / 3.0 + 5.0 / 3.0));
    }

    #[test]
    fn test_period_one_is_identity() {
        let data = [3.0_f64, 5.0, 4.0];
        assert_eq!(ema(&data, 1).unwrap(), data.to_vec());
        assert_eq!(rma(&data, 1).unwrap(), data.to_vec());
    }

    #[test]
    fn test_invalid_alpha() {
        assert!(ema_with_alpha(&[1.0_f64], 1, 0.0).is_err());
        assert!(ema_with_alpha(&[1.0_f64], 1, 1.5).is_err());
        assert!(ema_with_alpha(&[1.0_f64], 1, f64::NAN).is_err());
    }

    #[test]
    fn test_wma() {
        let data = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
        let out = wma(&data, 3).unwrap();
        assert!(out[1].is_nan());
        assert!(approx(out[2], (1.0 + 4.0 + 9.0) / 6.0));
        assert!(approx(out[3], (2.0 + 6.0 + 12.0) / 6.0));
        assert!(approx(out[4], (3.0 + 8.0 + 15.0) / 6.0));
    }

    #[test]
    fn test_wma_restarts_after_nan() {
        let data = [1.0_f64, f64::NAN, 2.0, 4.0];
        let out = wma(&data, 2).unwrap();
        assert!(out[2].is_nan());
        assert!(approx(out[3], (2.0 + 8.0) / 3.0));
    }
}
