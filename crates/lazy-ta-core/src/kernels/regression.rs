//! Least-squares linear regression over a trailing window.
//!
//! Within each window the x axis runs `0..period` from oldest to newest
//! bar. The fit is evaluated at `x = period - 1 - offset`, so `offset = 0`
//! gives the regression value at the current bar.
//!
//! ```text
//! slope     = (n * Σxy - Σx * Σy) / (n * Σx² - (Σx)²)
//! intercept = (Σy - slope * Σx) / n
//! linreg    = intercept + slope * (period - 1 - offset)
//! ```

use num_traits::NumCast;

use crate::error::{Error, Result};
use crate::traits::{validate_period, SeriesElement};

/// Slope and intercept of one window fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit<T> {
    /// Change per bar.
    pub slope: T,
    /// Value at the oldest bar of the window.
    pub intercept: T,
}

/// Fits a line to every trailing window of `data`.
///
/// Windows containing `NaN` yield `None`.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero.
pub fn line_fits<T: SeriesElement>(data: &[T], period: usize) -> Result<Vec<Option<LineFit<T>>>> {
    validate_period(period)?;
    let period_t = T::from_usize(period)?;
    let sum_x = T::from_usize(period * (period - 1) / 2)?;
    let sum_x2 = T::from_usize(period * (period - 1) * (2 * period - 1) / 6)?;
    #[allow(clippy::suspicious_operation_groupings)]
    let denom = period_t * sum_x2 - sum_x * sum_x;

    let mut fits = Vec::with_capacity(data.len());
    let mut run = 0_usize;
    for (i, x) in data.iter().enumerate() {
        run = if x.is_nan() { 0 } else { run + 1 };
        if run < period {
            fits.push(None);
            continue;
        }
        let start = i + 1 - period;
        let mut sum_y = T::zero();
        let mut sum_xy = T::zero();
        for (x_idx, &y) in data[start..=i].iter().enumerate() {
            sum_y = sum_y + y;
            sum_xy = sum_xy + T::from_usize(x_idx)? * y;
        }
        // a one-bar window has no slope
        let slope = if denom == T::zero() {
            T::zero()
        } else {
            (period_t * sum_xy - sum_x * sum_y) / denom
        };
        let intercept = (sum_y - slope * sum_x) / period_t;
        fits.push(Some(LineFit { slope, intercept }));
    }
    Ok(fits)
}

/// Regression value of each trailing window, evaluated `offset` bars before
/// the window's last bar.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `period` is zero and
/// `Error::NumericConversion` if the evaluation point does not fit in `T`.
pub fn linreg<T: SeriesElement>(data: &[T], period: usize, offset: isize) -> Result<Vec<T>> {
    let fits = line_fits(data, period)?;
    let last_x = isize::try_from(period).map_err(|_| Error::NumericConversion {
        context: "regression period to isize",
    })? - 1;
    let at: T = <T as NumCast>::from(last_x - offset).ok_or(Error::NumericConversion {
        context: "regression offset to series element",
    })?;
    Ok(fits
        .into_iter()
        .map(|fit| fit.map_or_else(T::nan, |f| f.intercept + f.slope * at))
        .collect())
}
