//! lazy-ta: sequential indicators and indicator composition over lazy series
//!
//! This crate builds on `lazy-ta-core` (bar store, series engine, kernels)
//! and adds the algorithms that cannot be written as windowed array
//! transforms, because each bar's output depends on state carried from the
//! previous one:
//!
//! - **Trend-flip trackers**: [`trend::ParabolicSar`], [`trend::Supertrend`]
//! - **Recursive smoothers**: [`smoothing::McGinley`], [`smoothing::Kama`]
//! - **Pivot confirmation**: [`pivot::ZigZag`]
//!
//! Each is a [`fold::Fold`]: state goes in, state and one output come out,
//! so every machine can be driven bar by bar or over a whole slice.
//!
//! On top of those sit the composition pieces a host needs: declarative
//! [`inputs`], the [`indicators::Indicator`] contract, a name-keyed
//! [`registry`] and the [`plot`] adapter boundary.
//!
//! # Quick Start
//!
//! ```
//! use lazy_ta::prelude::*;
//!
//! let bars: Vec<Bar> = [10.0, 11.0, 9.0, 12.0, 8.0]
//!     .into_iter()
//!     .enumerate()
//!     .map(|(t, c)| Bar::new(t as i64, c, c, c, c))
//!     .collect();
//!
//! let registry = Registry::with_builtin();
//! let out = registry
//!     .calculate("moving_average", &bars, [("length", "3")])
//!     .unwrap();
//! let ma = out.values("ma").unwrap();
//! assert!(ma[1].is_nan());
//! assert!((ma[2] - 10.0).abs() < 1e-10);
//! ```
//!
//! # Undefined values
//!
//! Insufficient history, zero divisions and degenerate ratios are `NaN` in
//! the output, never errors. Errors are reserved for invalid parameters,
//! unknown inputs or indicators, and publishing without a sink.

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod fold;
pub mod indicators;
pub mod inputs;
pub mod pivot;
pub mod plot;
pub mod prelude;
pub mod registry;
pub mod smoothing;
pub mod trend;
pub mod utils;

pub use lazy_ta_core::{Error, Result, SeriesElement};
pub use utils::{approx_eq, count_nan_prefix, EPSILON, LOOSE_EPSILON};
