//! Core traits for lazy-ta numeric operations.
//!
//! [`SeriesElement`] abstracts the kernels and state machines over `f32` and
//! `f64`. The validation helpers at the bottom are shared by every kernel so
//! that parameter errors read the same everywhere.
//!
//! # Example
//!
//! ```
//! use lazy_ta_core::traits::{validate_period, SeriesElement};
//!
//! fn window_mean<T: SeriesElement>(data: &[T], period: usize) -> lazy_ta_core::Result<T> {
//!     validate_period(period)?;
//!     let period_t = T::from_usize(period)?;
//!     let sum = data.iter().take(period).fold(T::zero(), |acc, &x| acc + x);
//!     Ok(sum / period_t)
//! }
//!
//! let mean = window_mean(&[1.0_f64, 2.0, 3.0, 4.0], 3).unwrap();
//! assert!((mean - 2.0).abs() < 1e-12);
//! ```

use num_traits::{Float, NumCast};

use crate::error::{Error, Result};

/// A trait for types that can be used as elements in a data series.
///
/// The bounds mirror what the kernels need: IEEE float semantics (so that
/// `NaN` can carry "undefined"), lossless-enough casts from window lengths,
/// and cheap copies.
pub trait SeriesElement: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Creates a series element from a `usize` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_usize(value: usize) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "usize to series element",
        })
    }

    /// Creates a series element from an `f64` value.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if the value cannot be represented in this type.
    #[inline]
    fn from_f64(value: f64) -> Result<Self> {
        <Self as NumCast>::from(value).ok_or(Error::NumericConversion {
            context: "f64 to series element",
        })
    }

    /// Widens the element to `f64`, mapping unrepresentable values to `NaN`.
    #[inline]
    #[must_use]
    fn to_f64_lossy(self) -> f64 {
        <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
    }

    /// Returns the constant 2 as this type.
    #[inline]
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Returns the constant 100 as this type.
    ///
    /// Used by percentage computations such as pivot deviation.
    #[inline]
    #[must_use]
    fn hundred() -> Self {
        <Self as NumCast>::from(100).unwrap_or_else(Self::nan)
    }
}

impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> SeriesElement for T {}

/// Validates that a window length is usable.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if the period is zero.
#[inline]
pub const fn validate_period(period: usize) -> Result<()> {
    if period == 0 {
        Err(Error::InvalidPeriod {
            period,
            reason: "period must be at least 1",
        })
    } else {
        Ok(())
    }
}

/// Validates that parallel input columns have the same length.
///
/// `names` labels each column for the error message.
///
/// # Errors
///
/// Returns `Error::LengthMismatch` naming the first column that differs from
/// the first one.
pub fn validate_same_length(columns: &[(&str, usize)]) -> Result<()> {
    let Some(&(first_name, first_len)) = columns.first() else {
        return Ok(());
    };
    for &(name, len) in &columns[1..] {
        if len != first_len {
            return Err(Error::LengthMismatch {
                description: format!("{first_name} has {first_len} elements, {name} has {len}"),
            });
        }
    }
    Ok(())
}
