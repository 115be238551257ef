//! Rolling window sums and moments.
//!
//! [`rolling_sum`] and [`sma`] keep a rolling sum: add the new value,
//! subtract the one leaving the window. Variance and standard deviation
//! rebuild a Welford [`RunningStat`] over the current window at every bar,
//! so no rounding from values that have left the window survives.
//!
//! All four share the warm-up rule: index `i` is defined iff the `period`
//! inputs ending at `i` are all non-`NaN`. A `NaN` input restarts the run,
//! so the window has to refill before output resumes.
//!
//! # Formula
//!
//! ```text
//! sum(i)   = sum(i-1) + x(i) - x(i-period)
//! add x:     count += 1; delta = x - mean; mean += delta / count; m2 += delta * (x - mean)
//!
//! variance = m2 / count   (population)
//! ```
//!
//! # Example
//!
//! ```
//! use lazy_ta_core::kernels::running_stat::{rolling_stddev, sma};
//!
//! let closes = [10.0_f64, 11.0, 9.0, 12.0, 8.0];
//! let avg = sma(&closes, 3).unwrap();
//! assert!(avg[1].is_nan());
//! assert!((avg[2] - 10.0).abs() < 1e-12);
//!
//! let dev = rolling_stddev(&closes, 3).unwrap();
//! assert!((dev[2] - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
//! ```

use crate::error::Result;
use crate::traits::{validate_period, SeriesElement};

/// Welford mean/variance accumulator.
#[derive(Debug, Clone, Copy)]
pub struct RunningStat<T> {
    count: usize,
    mean: T,
    m2: T, // sum of squared deviations from the mean
}

impl<T: SeriesElement> Default for RunningStat<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SeriesElement> RunningStat<T> {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: T::nan(),
            m2: T::zero(),
        }
    }

    /// Number of values currently accumulated.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Forgets every value.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Adds a value. `NaN` is ignored; callers reset instead.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the count cannot be represented in `T`.
    #[inline]
    pub fn update(&mut self, value: T) -> Result<()> {
        if value.is_nan() {
            return Ok(());
        }
        self.count += 1;
        if self.count == 1 {
            self.mean = value;
            self.m2 = T::zero();
            return Ok(());
        }
        let count_t = T::from_usize(self.count)?;
        let delta = value - self.mean;
        self.mean = self.mean + delta / count_t;
        self.m2 = self.m2 + delta * (value - self.mean);
        Ok(())
    }

    /// Mean of the accumulated values (`NaN` when empty).
    #[inline]
    #[must_use]
    pub fn mean(&self) -> T {
        self.mean
    }

    /// Population variance (`NaN` when empty).
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the count cannot be represented in `T`.
    #[inline]
    pub fn variance(&self) -> Result<T> {
        if self.count == 0 {
            return Ok(T::nan());
        }
        Ok(self.m2 / T::from_usize(self.count)?)
    }

    /// Population standard deviation (`NaN` when empty).
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the count cannot be represented in `T`.
    #[inline]
    pub fn stddev(&self) -> Result<T> {
        Ok(self.variance()?.sqrt())
    }
}

/// Which statistic a rolling pass reports.
#[derive(Debug, Clone, Copy)]
enum Moment {
    Sum,
    Mean,
    Variance,
    StdDev,
}

fn rolling_moment<T: SeriesElement>(data: &[T], period: usize, moment: Moment) -> Result<Vec<T>> {
    validate_period(period)?;
    let period_t = T::from_usize(period)?;
    let mut out = Vec::with_capacity(data.len());
    let mut sum = T::zero();
    // length of the NaN-free run ending at the current bar
    let mut run = 0_usize;

    for (i, &x) in data.iter().enumerate() {
        if x.is_nan() {
            sum = T::zero();
            run = 0;
            out.push(T::nan());
            continue;
        }
        run += 1;
        sum = if run > period {
            // the run is longer than the window, so data[i - period] is finite
            sum + x - data[i - period]
        } else {
            sum + x
        };
        if run < period {
            out.push(T::nan());
            continue;
        }
        out.push(match moment {
            Moment::Sum => sum,
            Moment::Mean => sum / period_t,
            Moment::Variance => window_stat(&data[i + 1 - period..=i])?.variance()?,
            Moment::StdDev => window_stat(&data[i + 1 - period..=i])?.stddev()?,
        });
    }
    Ok(out)
}

fn window_stat<T: SeriesElement>(window: &[T]) -> Result<RunningStat<T>> {
    let mut stat = RunningStat::new();
    for &x in window {
        stat.update(x)?;
    }
    Ok(stat)
}

/// Sum over a trailing window.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn rolling_sum<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_moment(data, period, Moment::Sum)
}

/// Simple moving average.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn sma<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_moment(data, period, Moment::Mean)
}

/// Population variance over a trailing window.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn rolling_variance<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_moment(data, period, Moment::Variance)
}

/// Population standard deviation over a trailing window.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn rolling_stddev<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<T>> {
    rolling_moment(data, period, Moment::StdDev)
}
