//! Parabolic SAR (stop and reverse).
//!
//! The SAR trails price and accelerates toward the extreme point (EP) of
//! the current trend:
//!
//! ```text
//! SAR(i) = SAR(i-1) + AF * (EP - SAR(i-1))
//! ```
//!
//! - AF (acceleration factor) starts at `start`, grows by `increment` each
//!   time the trend prints a new extreme, and is capped at `maximum`.
//! - In an uptrend the projected SAR may not rise above either of the two
//!   previous lows; in a downtrend it may not fall below the two previous
//!   highs.
//! - When price crosses the projected SAR the trend reverses: the SAR jumps
//!   to the old EP (kept on the far side of the crossing bar), the EP is
//!   reseeded from the crossing bar and AF falls back to `start`.
//!
//! Bar 0 is undefined. Bar 1 picks the initial direction
//! (`high[1] > high[0]` is up) and seeds the SAR from bar 0.
//!
//! # Example
//!
//! ```
//! use lazy_ta::trend::{ParabolicSar, TrendDirection};
//!
//! let high = [10.0_f64, 11.0, 12.0, 13.0, 12.0, 9.0];
//! let low = [9.0_f64, 10.0, 11.0, 12.0, 10.5, 8.0];
//! let points = ParabolicSar::new().compute(&high, &low).unwrap();
//!
//! assert!(points[0].value.is_nan());
//! assert!((points[1].value - 9.0).abs() < 1e-12);
//! assert_eq!(points[3].direction, Some(TrendDirection::Up));
//! assert_eq!(points[5].direction, Some(TrendDirection::Down));
//! ```

use lazy_ta_core::traits::validate_same_length;
use lazy_ta_core::{Error, Result, SeriesElement};

use crate::fold::{run, Fold};
use crate::trend::TrendDirection;
use crate::utils::constant;

/// One bar of SAR input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighLow<T> {
    /// Bar high.
    pub high: T,
    /// Bar low.
    pub low: T,
}

impl<T: SeriesElement> HighLow<T> {
    fn is_nan(&self) -> bool {
        self.high.is_nan() || self.low.is_nan()
    }
}

/// One bar of SAR output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarPoint<T> {
    /// SAR level, `NaN` while undefined.
    pub value: T,
    /// Trend the level belongs to.
    pub direction: Option<TrendDirection>,
    /// Acceleration factor in effect after this bar.
    pub af: T,
    /// Extreme point of the current trend.
    pub extreme: T,
}

impl<T: SeriesElement> SarPoint<T> {
    fn undefined() -> Self {
        Self {
            value: T::nan(),
            direction: None,
            af: T::nan(),
            extreme: T::nan(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Trend<T> {
    direction: TrendDirection,
    level: T,
    af: T,
    ep: T,
}

/// State carried between bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarState<T> {
    prev: Option<HighLow<T>>,
    prev2: Option<HighLow<T>>,
    trend: Option<Trend<T>>,
}

impl<T: SeriesElement> SarState<T> {
    /// Direction of the current trend, once one exists.
    #[must_use]
    pub fn direction(&self) -> Option<TrendDirection> {
        self.trend.map(|t| t.direction)
    }

    fn advance(self, bar: HighLow<T>, trend: Trend<T>) -> Self {
        Self {
            prev: Some(bar),
            prev2: self.prev,
            trend: Some(trend),
        }
    }
}

/// Parabolic SAR configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParabolicSar<T> {
    start: T,
    increment: T,
    maximum: T,
}

impl<T: SeriesElement> Default for ParabolicSar<T> {
    fn default() -> Self {
        Self {
            start: constant(0.02),
            increment: constant(0.02),
            maximum: constant(0.2),
        }
    }
}

impl<T: SeriesElement> ParabolicSar<T> {
    /// Creates a tracker with the classic 0.02 / 0.02 / 0.2 parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial acceleration factor.
    #[must_use]
    pub const fn start(mut self, start: T) -> Self {
        self.start = start;
        self
    }

    /// Sets the acceleration factor step.
    #[must_use]
    pub const fn increment(mut self, increment: T) -> Self {
        self.increment = increment;
        self
    }

    /// Sets the acceleration factor ceiling.
    #[must_use]
    pub const fn maximum(mut self, maximum: T) -> Self {
        self.maximum = maximum;
        self
    }

    /// Checks `0 < start <= maximum` and `increment >= 0`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if !(self.start > T::zero()) {
            return Err(Error::InvalidParameter {
                name: "start",
                reason: "must be positive".to_string(),
            });
        }
        if !(self.increment >= T::zero()) {
            return Err(Error::InvalidParameter {
                name: "increment",
                reason: "must not be negative".to_string(),
            });
        }
        if !(self.maximum >= self.start) {
            return Err(Error::InvalidParameter {
                name: "maximum",
                reason: "must be at least start".to_string(),
            });
        }
        Ok(())
    }

    /// Runs the tracker over parallel high/low columns.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for bad parameters and
    /// `Error::LengthMismatch` if the columns differ in length.
    pub fn compute(&self, high: &[T], low: &[T]) -> Result<Vec<SarPoint<T>>> {
        self.validate()?;
        validate_same_length(&[("high", high.len()), ("low", low.len())])?;
        let bars = high
            .iter()
            .zip(low)
            .map(|(&high, &low)| HighLow { high, low });
        Ok(run(self, bars))
    }

    fn seed(&self, first: HighLow<T>, second: HighLow<T>) -> Trend<T> {
        if second.high > first.high {
            Trend {
                direction: TrendDirection::Up,
                level: first.low,
                af: self.start,
                ep: second.high,
            }
        } else {
            Trend {
                direction: TrendDirection::Down,
                level: first.high,
                af: self.start,
                ep: second.low,
            }
        }
    }

    fn follow(&self, trend: Trend<T>, state: &SarState<T>, bar: HighLow<T>) -> Trend<T> {
        let Trend {
            direction,
            level,
            af,
            ep,
        } = trend;
        let mut projected = level + af * (ep - level);
        let recent = [state.prev, state.prev2];

        match direction {
            TrendDirection::Up => {
                for prior in recent.iter().flatten() {
                    projected = projected.min(prior.low);
                }
                if bar.low < projected {
                    log::debug!("sar flipped down at low {}", bar.low.to_f64_lossy());
                    return Trend {
                        direction: TrendDirection::Down,
                        level: ep.max(bar.high),
                        af: self.start,
                        ep: bar.low,
                    };
                }
                let (ep, af) = if bar.high > ep {
                    (bar.high, (af + self.increment).min(self.maximum))
                } else {
                    (ep, af)
                };
                Trend {
                    direction,
                    level: projected,
                    af,
                    ep,
                }
            }
            TrendDirection::Down => {
                for prior in recent.iter().flatten() {
                    projected = projected.max(prior.high);
                }
                if bar.high > projected {
                    log::debug!("sar flipped up at high {}", bar.high.to_f64_lossy());
                    return Trend {
                        direction: TrendDirection::Up,
                        level: ep.min(bar.low),
                        af: self.start,
                        ep: bar.high,
                    };
                }
                let (ep, af) = if bar.low < ep {
                    (bar.low, (af + self.increment).min(self.maximum))
                } else {
                    (ep, af)
                };
                Trend {
                    direction,
                    level: projected,
                    af,
                    ep,
                }
            }
        }
    }
}

impl<T: SeriesElement> Fold for ParabolicSar<T> {
    type State = SarState<T>;
    type Input = HighLow<T>;
    type Output = SarPoint<T>;

    fn initial(&self) -> SarState<T> {
        SarState {
            prev: None,
            prev2: None,
            trend: None,
        }
    }

    /// A bar with a `NaN` high or low reports an undefined point and is
    /// skipped, leaving the state as it was.
    fn step(&self, state: SarState<T>, bar: HighLow<T>) -> (SarState<T>, SarPoint<T>) {
        if bar.is_nan() {
            return (state, SarPoint::undefined());
        }
        let trend = match (state.prev, state.trend) {
            (None, _) => {
                let next = SarState {
                    prev: Some(bar),
                    prev2: None,
                    trend: None,
                };
                return (next, SarPoint::undefined());
            }
            (Some(first), None) => self.seed(first, bar),
            (Some(_), Some(trend)) => self.follow(trend, &state, bar),
        };
        let point = SarPoint {
            value: trend.level,
            direction: Some(trend.direction),
            af: trend.af,
            extreme: trend.ep,
        };
        (state.advance(bar, trend), point)
    }
}
