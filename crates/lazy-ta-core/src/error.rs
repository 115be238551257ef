//! Error types for lazy-ta.
//!
//! Numeric trouble (insufficient history, division by zero, degenerate
//! ratios) is never an error here: it is represented as `NaN` in the output.
//! The variants below cover structural misuse only, such as bad indices,
//! foreign series handles, invalid parameters and missing adapters.

use thiserror::Error;

/// The main error type for lazy-ta operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input data series is empty where at least one element is required.
    #[error("empty input: no data provided")]
    EmptyInput,

    /// The period (window length) parameter is invalid.
    #[error("invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The invalid period value that was provided.
        period: usize,
        /// Description of why the period is invalid.
        reason: &'static str,
    },

    /// Multi-input kernels received inputs of different lengths.
    #[error("length mismatch: {description}")]
    LengthMismatch {
        /// Description of the mismatched inputs.
        description: String,
    },

    /// Failed to convert a numeric value to the target type.
    ///
    /// This occurs when `NumCast::from()` cannot represent a value (for
    /// example a `usize` window length) in the series element type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },

    /// A configuration parameter of a kernel or state machine is invalid.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A bar store mutation addressed a position that does not exist.
    #[error("{operation} out of range: index {index}, store holds {len} bars")]
    OutOfRange {
        /// The store operation that failed (`overwrite`, `remove_last`).
        operation: &'static str,
        /// The index that was addressed.
        index: usize,
        /// Number of bars in the store at the time of the call.
        len: usize,
    },

    /// A series handle does not belong to the graph it was used with.
    #[error("unknown series handle {id}")]
    UnknownSeries {
        /// Raw index of the handle.
        id: usize,
    },

    /// A materialized series was read against a store state other than the
    /// one it was captured from.
    #[error("stale snapshot: captured at version {captured}, store is at version {current}")]
    StaleSnapshot {
        /// Store version the snapshot was captured at.
        captured: u64,
        /// Store version it was read against.
        current: u64,
    },

    /// An input id is not declared by the indicator.
    #[error("unknown input '{id}'")]
    UnknownInput {
        /// The undeclared input id.
        id: String,
    },

    /// An input value has the wrong type or violates its declared bounds.
    #[error("invalid input '{id}': {reason}")]
    InvalidInput {
        /// The input id.
        id: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// No indicator is registered under the requested name.
    #[error("unknown indicator '{name}'")]
    UnknownIndicator {
        /// The requested name.
        name: String,
    },

    /// Plot data was published before a chart adapter was attached.
    ///
    /// Only the plot adapter boundary raises this; numeric code never does.
    #[error("no chart context attached while publishing plot '{plot_id}'")]
    ChartContextMissing {
        /// First plot that could not be delivered.
        plot_id: String,
    },
}

/// Convenience type alias for Results using the lazy-ta Error type.
pub type Result<T> = std::result::Result<T, Error>;
