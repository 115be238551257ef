//! Lazy, memoized per-bar series.
//!
//! A series is a node in a [`SeriesGraph`] arena: either a leaf (a store
//! field, a constant, a materialized snapshot) or a combinator over other
//! nodes. Nothing is computed when a node is built. Reading a node pulls its
//! operands, caches the result against the store's `(id, version)` and
//! serves it from cache until the store changes.
//!
//! Results are always aligned 1:1 with the store's bars, and every
//! combinator is causal, so `offset(n)` of any node is the value that node
//! had `n` bars earlier.
//!
//! # Example
//!
//! ```
//! use lazy_ta_core::series::SeriesGraph;
//! use lazy_ta_core::store::{Bar, BarStore, Source};
//!
//! let store = BarStore::from_bars(
//!     [10.0, 11.0, 9.0, 12.0, 8.0]
//!         .into_iter()
//!         .enumerate()
//!         .map(|(t, c)| Bar::new(t as i64, c, c, c, c)),
//! );
//!
//! let mut graph = SeriesGraph::new();
//! let close = graph.source(Source::Close);
//! let basis = graph.sma(close, 3).unwrap();
//! let above = graph.gt(close, basis).unwrap();
//!
//! let flags = graph.to_array(above, &store).unwrap();
//! assert!(flags[1].is_nan());
//! assert_eq!(&flags[2..], &[0.0, 1.0, 0.0]);
//! ```

mod graph;
mod node;
mod ops;

pub use graph::{SeriesGraph, SeriesId};
pub use node::{CacheKey, NodeKind};
pub use ops::{BinaryOp, UnaryOp};
