//! Supertrend.
//!
//! Two ATR bands around the bar midpoint ratchet toward price and only
//! loosen when the previous close broke through them:
//!
//! ```text
//! upper = hl2 + factor * atr     kept at prev_upper unless upper < prev_upper or close[1] > prev_upper
//! lower = hl2 - factor * atr     kept at prev_lower unless lower > prev_lower or close[1] < prev_lower
//! ```
//!
//! In a downtrend the line is the upper band and the trend turns up when
//! the close rises above it; in an uptrend the line is the lower band and
//! the trend turns down when the close falls below it. The first bar with a
//! defined ATR starts down.

use lazy_ta_core::kernels::atr;
use lazy_ta_core::traits::validate_period;
use lazy_ta_core::{Error, Result, SeriesElement};

use crate::fold::{run, Fold};
use crate::trend::TrendDirection;
use crate::utils::constant;

/// One bar of supertrend input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupertrendInput<T> {
    /// Bar high.
    pub high: T,
    /// Bar low.
    pub low: T,
    /// Bar close.
    pub close: T,
    /// Average true range at this bar.
    pub atr: T,
}

/// One bar of supertrend output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupertrendPoint<T> {
    /// The active band, `NaN` while the ATR is undefined.
    pub value: T,
    /// Trend direction.
    pub direction: Option<TrendDirection>,
}

/// State carried between bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupertrendState<T> {
    upper: Option<T>,
    lower: Option<T>,
    close: Option<T>,
    direction: Option<TrendDirection>,
}

impl<T> SupertrendState<T> {
    /// Direction after the last bar.
    #[must_use]
    pub const fn direction(&self) -> Option<TrendDirection> {
        self.direction
    }
}

/// Supertrend configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Supertrend<T> {
    factor: T,
    atr_period: usize,
}

impl<T: SeriesElement> Default for Supertrend<T> {
    fn default() -> Self {
        Self {
            factor: constant(3.0),
            atr_period: 10,
        }
    }
}

impl<T: SeriesElement> Supertrend<T> {
    /// Creates a tracker with factor 3 over a 10-bar ATR.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the band multiplier.
    #[must_use]
    pub const fn factor(mut self, factor: T) -> Self {
        self.factor = factor;
        self
    }

    /// Sets the ATR length.
    #[must_use]
    pub const fn atr_period(mut self, atr_period: usize) -> Self {
        self.atr_period = atr_period;
        self
    }

    /// The configured ATR length.
    #[must_use]
    pub const fn period(&self) -> usize {
        self.atr_period
    }

    /// Checks `factor > 0` and a non-zero ATR length.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` or `Error::InvalidPeriod`.
    pub fn validate(&self) -> Result<()> {
        validate_period(self.atr_period)?;
        if !(self.factor > T::zero()) || self.factor.is_infinite() {
            return Err(Error::InvalidParameter {
                name: "factor",
                reason: "must be a positive number".to_string(),
            });
        }
        Ok(())
    }

    /// Computes the ATR and runs the tracker over it.
    ///
    /// # Errors
    ///
    /// Returns parameter errors from [`Supertrend::validate`] and
    /// `Error::LengthMismatch` if the columns differ in length.
    pub fn compute(&self, high: &[T], low: &[T], close: &[T]) -> Result<Vec<SupertrendPoint<T>>> {
        self.validate()?;
        let atr = atr(high, low, close, self.atr_period)?;
        let inputs = (0..high.len()).map(|i| SupertrendInput {
            high: high[i],
            low: low[i],
            close: close[i],
            atr: atr[i],
        });
        Ok(run(self, inputs))
    }
}

impl<T: SeriesElement> Fold for Supertrend<T> {
    type State = SupertrendState<T>;
    type Input = SupertrendInput<T>;
    type Output = SupertrendPoint<T>;

    fn initial(&self) -> SupertrendState<T> {
        SupertrendState {
            upper: None,
            lower: None,
            close: None,
            direction: None,
        }
    }

    fn step(
        &self,
        state: SupertrendState<T>,
        input: SupertrendInput<T>,
    ) -> (SupertrendState<T>, SupertrendPoint<T>) {
        let SupertrendInput {
            high,
            low,
            close,
            atr,
        } = input;
        let prev_close = state.close.filter(|c| !c.is_nan());

        if atr.is_nan() || high.is_nan() || low.is_nan() || close.is_nan() {
            let next = SupertrendState {
                upper: None,
                lower: None,
                close: Some(close),
                direction: None,
            };
            let point = SupertrendPoint {
                value: T::nan(),
                direction: None,
            };
            return (next, point);
        }

        let mid = (high + low) / T::two();
        let raw_upper = mid + self.factor * atr;
        let raw_lower = mid - self.factor * atr;

        let lower = match state.lower {
            Some(prev) if !(raw_lower > prev || prev_close.is_some_and(|c| c < prev)) => prev,
            _ => raw_lower,
        };
        let upper = match state.upper {
            Some(prev) if !(raw_upper < prev || prev_close.is_some_and(|c| c > prev)) => prev,
            _ => raw_upper,
        };

        let direction = match state.direction {
            None => TrendDirection::Down,
            Some(TrendDirection::Down) if close > upper => TrendDirection::Up,
            Some(TrendDirection::Up) if close < lower => TrendDirection::Down,
            Some(current) => current,
        };
        if state.direction.is_some_and(|d| d != direction) {
            log::debug!("supertrend turned {direction} at close {}", close.to_f64_lossy());
        }

        let value = if direction.is_up() { lower } else { upper };
        let next = SupertrendState {
            upper: Some(upper),
            lower: Some(lower),
            close: Some(close),
            direction: Some(direction),
        };
        (
            next,
            SupertrendPoint {
                value,
                direction: Some(direction),
            },
        )
    }
}
