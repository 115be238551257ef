//! Explicit state threading for bar-by-bar algorithms.
//!
//! A [`Fold`] never hides state in closures or `&mut self`: each step
//! consumes the previous state and returns the next one with the bar's
//! output. That keeps every state machine testable on hand-written inputs
//! and makes "recompute from scratch" the only way to reset it.
//!
//! # Example
//!
//! ```
//! use lazy_ta::fold::{run, Fold};
//!
//! /// Running maximum.
//! struct Peak;
//!
//! impl Fold for Peak {
//!     type State = f64;
//!     type Input = f64;
//!     type Output = f64;
//!
//!     fn initial(&self) -> f64 {
//!         f64::NEG_INFINITY
//!     }
//!
//!     fn step(&self, state: f64, input: f64) -> (f64, f64) {
//!         let next = state.max(input);
//!         (next, next)
//!     }
//! }
//!
//! assert_eq!(run(&Peak, [1.0, 3.0, 2.0]), vec![1.0, 3.0, 3.0]);
//! ```

/// A sequential algorithm expressed as `(state, input) -> (state, output)`.
pub trait Fold {
    /// Carried state.
    type State;
    /// One bar of input.
    type Input;
    /// One bar of output.
    type Output;

    /// State before the first bar.
    fn initial(&self) -> Self::State;

    /// Advances by one bar.
    fn step(&self, state: Self::State, input: Self::Input) -> (Self::State, Self::Output);
}

/// Drives `fold` over `inputs` from first to last and collects the outputs.
pub fn run<F, I>(fold: &F, inputs: I) -> Vec<F::Output>
where
    F: Fold,
    I: IntoIterator<Item = F::Input>,
{
    run_with_state(fold, inputs).1
}

/// Like [`run`], also returning the state after the last bar.
pub fn run_with_state<F, I>(fold: &F, inputs: I) -> (F::State, Vec<F::Output>)
where
    F: Fold,
    I: IntoIterator<Item = F::Input>,
{
    let inputs = inputs.into_iter();
    let mut outputs = Vec::with_capacity(inputs.size_hint().0);
    let mut state = fold.initial();
    for input in inputs {
        let (next, output) = fold.step(state, input);
        state = next;
        outputs.push(output);
    }
    (state, outputs)
}
