//! Node kinds and per-node cache.

use std::fmt;

use crate::kernels::WindowKernel;
use crate::series::ops::{BinaryOp, UnaryOp};
use crate::series::SeriesId;
use crate::store::{BarStore, Source, StoreId};

/// Identifies one committed state of one store.
///
/// A cached array is valid exactly when its key equals the key of the store
/// it is read against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Store instance.
    pub store: StoreId,
    /// Store version.
    pub version: u64,
}

impl CacheKey {
    /// Current key of `store`.
    #[must_use]
    pub const fn of(store: &BarStore) -> Self {
        Self {
            store: store.id(),
            version: store.version(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@v{}", self.store, self.version)
    }
}

/// What a node computes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Field extracted from the store.
    Source(Source),
    /// The same value on every bar.
    Constant(f64),
    /// Flat array captured by `materialize`, valid only at `captured`.
    Snapshot {
        /// Store state the array was computed from.
        captured: CacheKey,
    },
    /// Element-wise combination of two series.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: SeriesId,
        /// Right operand.
        rhs: SeriesId,
    },
    /// Element-wise transform of one series.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        input: SeriesId,
    },
    /// The value `bars` positions back.
    Offset {
        /// Operand.
        input: SeriesId,
        /// Lookback in bars.
        bars: usize,
    },
    /// Windowed reduction.
    Window {
        /// Operand.
        input: SeriesId,
        /// Reduction.
        kernel: WindowKernel,
        /// Window length in bars.
        length: usize,
    },
}

impl NodeKind {
    /// Operands this node reads, in evaluation order.
    #[must_use]
    pub fn operands(&self) -> Vec<SeriesId> {
        match *self {
            Self::Source(_) | Self::Constant(_) | Self::Snapshot { .. } => Vec::new(),
            Self::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Self::Unary { input, .. } | Self::Offset { input, .. } | Self::Window { input, .. } => {
                vec![input]
            }
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(source) => write!(f, "{source}"),
            Self::Constant(value) => write!(f, "{value}"),
            Self::Snapshot { captured } => write!(f, "snapshot[{captured}]"),
            Self::Binary { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
            Self::Unary { op, input } => write!(f, "{op}({input})"),
            Self::Offset { input, bars } => write!(f, "{input}[{bars}]"),
            Self::Window {
                input,
                kernel,
                length,
            } => write!(f, "{kernel}({input}, {length})"),
        }
    }
}

/// A node as stored in the arena.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) cache: Option<Cache>,
}

impl Node {
    pub(crate) const fn new(kind: NodeKind) -> Self {
        Self { kind, cache: None }
    }

    /// Cached values if they were computed at `key`.
    pub(crate) fn fresh(&self, key: CacheKey) -> Option<&[f64]> {
        self.cache
            .as_ref()
            .filter(|cache| cache.key == key)
            .map(|cache| cache.values.as_slice())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Cache {
    pub(crate) key: CacheKey,
    pub(crate) values: Vec<f64>,
}
