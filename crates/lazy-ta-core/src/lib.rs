//! lazy-ta-core: versioned bar storage, lazy series and numeric kernels
//!
//! This crate is the evaluation engine underneath `lazy-ta`:
//!
//! - [`store`]: the [`BarStore`](store::BarStore), an ordered OHLCV sequence
//!   with a version counter bumped on every mutation
//! - [`series`]: the [`SeriesGraph`](series::SeriesGraph), an arena of lazily
//!   evaluated per-bar nodes cached against the store's version
//! - [`kernels`]: pure array-to-array functions (rolling statistics, extrema,
//!   exponential smoothing, regression, true range)
//!
//! Values are `NaN` wherever they are undefined: during warm-up, after a
//! zero division, or wherever an operand is `NaN`. Errors are reserved for
//! structural misuse.
//!
//! # Quick Start
//!
//! ```
//! use lazy_ta_core::prelude::*;
//!
//! let mut store = BarStore::new();
//! for (t, close) in [10.0, 11.0, 9.0, 12.0, 8.0].into_iter().enumerate() {
//!     store.append(Bar::new(t as i64, close, close, close, close));
//! }
//!
//! let mut graph = SeriesGraph::new();
//! let close = graph.source(Source::Close);
//! let avg = graph.sma(close, 3).unwrap();
//!
//! let values = graph.to_array(avg, &store).unwrap();
//! assert!(values[1].is_nan());
//! assert!((values[2] - 10.0).abs() < 1e-10);
//! ```

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

pub mod error;
pub mod kernels;
pub mod series;
pub mod store;
pub mod traits;

pub use error::{Error, Result};
pub use traits::SeriesElement;

/// Everything needed to build and read series.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::kernels::WindowKernel;
    pub use crate::series::{BinaryOp, SeriesGraph, SeriesId, UnaryOp};
    pub use crate::store::{Bar, BarStore, Source};
    pub use crate::traits::SeriesElement;
}
