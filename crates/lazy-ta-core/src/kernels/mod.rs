//! Stateless array-in, array-out numeric kernels.
//!
//! Every kernel returns a vector exactly as long as its input and shares one
//! warm-up rule: output `i` is defined iff the `period` inputs ending at `i`
//! are all non-`NaN`. Errors are reserved for structural misuse (a zero
//! window, mismatched column lengths).
//!
//! # Kernels
//!
//! - [`running_stat`]: Welford accumulator, rolling sum / mean / variance / stddev
//! - [`rolling_extrema`]: monotonic deque for highest / lowest and their offsets
//! - [`smoothing`]: EMA, RMA and WMA
//! - [`regression`]: least-squares line over a window
//! - [`range`]: true range and ATR
//! - [`window`]: positional shift and change
//!
//! [`WindowKernel`] is the closed set of windowed reductions the Series
//! engine can put in a graph node.

pub mod range;
pub mod regression;
pub mod rolling_extrema;
pub mod running_stat;
pub mod smoothing;
pub mod window;

use std::fmt;

use crate::error::Result;
use crate::traits::{validate_period, SeriesElement};

pub use range::{atr, true_range};
pub use regression::{line_fits, linreg, LineFit};
pub use rolling_extrema::{
    extremum_bars_naive, extremum_naive, highest, highest_bars, lowest, lowest_bars, Extremum,
    MonotonicDeque,
};
pub use running_stat::{rolling_stddev, rolling_sum, rolling_variance, sma, RunningStat};
pub use smoothing::{ema, ema_with_alpha, rma, wma};
pub use window::{change, shift};

/// A windowed reduction usable as a Series node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKernel {
    /// Rolling sum.
    Sum,
    /// Simple moving average.
    Sma,
    /// Exponential moving average.
    Ema,
    /// Wilder's moving average.
    Rma,
    /// Weighted moving average.
    Wma,
    /// Population standard deviation.
    StdDev,
    /// Population variance.
    Variance,
    /// Highest value.
    Highest,
    /// Lowest value.
    Lowest,
    /// Offset to the highest value.
    HighestBars,
    /// Offset to the lowest value.
    LowestBars,
    /// Linear regression value at the current bar.
    LinReg,
    /// Difference against the value `length` bars back.
    Change,
}

impl WindowKernel {
    /// Short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Sma => "sma",
            Self::Ema => "ema",
            Self::Rma => "rma",
            Self::Wma => "wma",
            Self::StdDev => "stdev",
            Self::Variance => "variance",
            Self::Highest => "highest",
            Self::Lowest => "lowest",
            Self::HighestBars => "highestbars",
            Self::LowestBars => "lowestbars",
            Self::LinReg => "linreg",
            Self::Change => "change",
        }
    }

    /// Runs the kernel over `data`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` if `length` is zero.
    pub fn apply<T: SeriesElement>(self, data: &[T], length: usize) -> Result<Vec<T>> {
        validate_period(length)?;
        match self {
            Self::Sum => rolling_sum(data, length),
            Self::Sma => sma(data, length),
            Self::Ema => ema(data, length),
            Self::Rma => rma(data, length),
            Self::Wma => wma(data, length),
            Self::StdDev => rolling_stddev(data, length),
            Self::Variance => rolling_variance(data, length),
            Self::Highest => highest(data, length),
            Self::Lowest => lowest(data, length),
            Self::HighestBars => highest_bars(data, length),
            Self::LowestBars => lowest_bars(data, length),
            Self::LinReg => linreg(data, length, 0),
            Self::Change => Ok(change(data, length)),
        }
    }
}

impl fmt::Display for WindowKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const ALL: [WindowKernel; 13] = [
        WindowKernel::Sum,
        WindowKernel::Sma,
        WindowKernel::Ema,
        WindowKernel::Rma,
        WindowKernel::Wma,
        WindowKernel::StdDev,
        WindowKernel::Variance,
        WindowKernel::Highest,
        WindowKernel::Lowest,
        WindowKernel::HighestBars,
        WindowKernel::LowestBars,
        WindowKernel::LinReg,
        WindowKernel::Change,
    ];

    #[test]
    fn test_every_kernel_preserves_length() {
        let data: Vec<f64> = (0..20).map(|i| f64::from(i % 7) + 1.0).collect();
        for kernel in ALL {
            let out = kernel.apply(&data, 4).unwrap();
            assert_eq!(out.len(), data.len(), "{kernel}");
            assert!(kernel.apply::<f64>(&[], 4).unwrap().is_empty(), "{kernel}");
        }
    }

    #[test]
    fn test_every_kernel_warms_up() {
        let data: Vec<f64> = (0..10).map(f64::from).collect();
        for kernel in ALL {
            let out = kernel.apply(&data, 3).unwrap();
            let first_defined = out.iter().position(|x| !x.is_nan());
            let expected = if kernel == WindowKernel::Change { 3 } else { 2 };
            assert_eq!(first_defined, Some(expected), "{kernel}");
        }
    }

    #[test]
    fn test_zero_length_rejected_for_all() {
        for kernel in ALL {
            assert!(matches!(
                kernel.apply(&[1.0_f64], 0),
                Err(Error::InvalidPeriod { .. })
            ));
        }
    }
}
