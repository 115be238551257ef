//! Kaufman adaptive moving average.
//!
//! The smoothing constant slides between a fast and a slow EMA constant
//! according to the efficiency ratio of the last `length` bars:
//!
//! ```text
//! ER   = |x - x[length]| / Σ |x[j] - x[j-1]|         (0 when there is no movement)
//! SC   = (ER * (fast_sc - slow_sc) + slow_sc)^2      with sc(n) = 2 / (n + 1)
//! KAMA = KAMA[1] + SC * (x - KAMA[1])
//! ```
//!
//! The first value is the input itself at the first bar with `length`
//! prior bars. A `NaN` input resets the average.

use std::collections::VecDeque;

use lazy_ta_core::traits::validate_period;
use lazy_ta_core::{Result, SeriesElement};

use crate::fold::{run, Fold};

/// KAMA configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kama {
    length: usize,
    fast: usize,
    slow: usize,
}

impl Default for Kama {
    fn default() -> Self {
        Self {
            length: 10,
            fast: 2,
            slow: 30,
        }
    }
}

impl Kama {
    /// KAMA over `length` bars with the usual 2/30 fast/slow constants.
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Self::default()
        }
    }

    /// Sets the fast EMA length.
    #[must_use]
    pub const fn fast(mut self, fast: usize) -> Self {
        self.fast = fast;
        self
    }

    /// Sets the slow EMA length.
    #[must_use]
    pub const fn slow(mut self, slow: usize) -> Self {
        self.slow = slow;
        self
    }

    /// The fold for element type `T`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` if any length is zero.
    pub fn fold<T: SeriesElement>(&self) -> Result<KamaFold<T>> {
        validate_period(self.length)?;
        validate_period(self.fast)?;
        validate_period(self.slow)?;
        let fast_sc = T::two() / (T::from_usize(self.fast)? + T::one());
        let slow_sc = T::two() / (T::from_usize(self.slow)? + T::one());
        Ok(KamaFold {
            length: self.length,
            fast_sc,
            slow_sc,
        })
    }

    /// Runs the average over `data`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` if any length is zero.
    pub fn compute<T: SeriesElement>(&self, data: &[T]) -> Result<Vec<T>> {
        let fold = self.fold()?;
        Ok(run(&fold, data.iter().copied()))
    }
}

/// The per-bar recursion of [`Kama`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KamaFold<T> {
    length: usize,
    fast_sc: T,
    slow_sc: T,
}

/// Recent inputs and the previous average.
#[derive(Debug, Clone, PartialEq)]
pub struct KamaState<T> {
    window: VecDeque<T>,
    prev: Option<T>,
}

impl<T: SeriesElement> KamaFold<T> {
    fn efficiency(&self, window: &VecDeque<T>) -> T {
        let (Some(&first), Some(&last)) = (window.front(), window.back()) else {
            return T::zero();
        };
        let change = (last - first).abs();
        let volatility = window
            .iter()
            .zip(window.iter().skip(1))
            .fold(T::zero(), |acc, (&a, &b)| acc + (b - a).abs());
        if volatility > T::zero() {
            change / volatility
        } else {
            T::zero()
        }
    }
}

impl<T: SeriesElement> Fold for KamaFold<T> {
    type State = KamaState<T>;
    type Input = T;
    type Output = T;

    fn initial(&self) -> KamaState<T> {
        KamaState {
            window: VecDeque::with_capacity(self.length + 1),
            prev: None,
        }
    }

    fn step(&self, mut state: KamaState<T>, x: T) -> (KamaState<T>, T) {
        if x.is_nan() {
            return (self.initial(), T::nan());
        }
        state.window.push_back(x);
        if state.window.len() > self.length + 1 {
            state.window.pop_front();
        }
        if state.window.len() <= self.length {
            return (state, T::nan());
        }
        let value = match state.prev {
            None => x,
            Some(prev) => {
                let sc = self.efficiency(&state.window) * (self.fast_sc - self.slow_sc) + self.slow_sc;
                prev + sc * sc * (x - prev)
            }
        };
        state.prev = Some(value);
        (state, value)
    }
}
