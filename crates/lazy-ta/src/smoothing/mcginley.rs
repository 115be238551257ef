//! McGinley dynamic.
//!
//! A feedback average whose speed adapts to how far price has run from it:
//!
//! ```text
//! md(i) = md(i-1) + (x - md(i-1)) / (length * (x / md(i-1))^4)
//! ```
//!
//! The first value is the EMA of the source at the first bar where that EMA
//! is defined. When the previous value is zero, or the ratio or divisor is
//! not a finite non-zero number, the bar falls back to the raw input.

use lazy_ta_core::kernels::ema;
use lazy_ta_core::traits::validate_period;
use lazy_ta_core::{Result, SeriesElement};

use crate::fold::{run, Fold};

/// One bar of input: the source value and its EMA (the seed candidate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McGinleyInput<T> {
    /// Source value.
    pub value: T,
    /// `ema(source, length)` at this bar.
    pub seed: T,
}

/// McGinley dynamic configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McGinley {
    length: usize,
}

impl McGinley {
    /// Creates a McGinley dynamic over `length` bars.
    #[must_use]
    pub const fn new(length: usize) -> Self {
        Self { length }
    }

    /// Configured length.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Runs the average over `data`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` if the length is zero.
    pub fn compute<T: SeriesElement>(&self, data: &[T]) -> Result<Vec<T>> {
        validate_period(self.length)?;
        let seeds = ema(data, self.length)?;
        let length = T::from_usize(self.length)?;
        let fold = McGinleyFold { length };
        let inputs = data
            .iter()
            .zip(seeds)
            .map(|(&value, seed)| McGinleyInput { value, seed });
        Ok(run(&fold, inputs))
    }

    /// The fold for element type `T`, for driving bar by bar.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` if the length is zero.
    pub fn fold<T: SeriesElement>(&self) -> Result<McGinleyFold<T>> {
        validate_period(self.length)?;
        Ok(McGinleyFold {
            length: T::from_usize(self.length)?,
        })
    }
}

/// The per-bar recursion of [`McGinley`]; the state is the previous value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McGinleyFold<T> {
    length: T,
}

impl<T: SeriesElement> McGinleyFold<T> {
    #[allow(clippy::float_cmp)]
    fn next(&self, prev: T, x: T) -> T {
        if prev == T::zero() {
            return x;
        }
        let ratio = x / prev;
        let divisor = self.length * ratio.powi(4);
        if !ratio.is_finite() || !divisor.is_finite() || divisor == T::zero() {
            return x;
        }
        prev + (x - prev) / divisor
    }
}

impl<T: SeriesElement> Fold for McGinleyFold<T> {
    type State = Option<T>;
    type Input = McGinleyInput<T>;
    type Output = T;

    fn initial(&self) -> Option<T> {
        None
    }

    fn step(&self, state: Option<T>, input: McGinleyInput<T>) -> (Option<T>, T) {
        if input.value.is_nan() {
            return (state, T::nan());
        }
        let value = match state {
            Some(prev) => self.next(prev, input.value),
            None if input.seed.is_nan() => return (None, T::nan()),
            None => input.seed,
        };
        (Some(value), value)
    }
}
