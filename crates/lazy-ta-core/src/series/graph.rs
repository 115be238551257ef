//! Node arena and pull-based evaluation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, DfsPostOrder, Reversed};

use crate::error::{Error, Result};
use crate::kernels::{shift, WindowKernel};
use crate::series::node::{Cache, CacheKey, Node, NodeKind};
use crate::series::ops::{BinaryOp, UnaryOp};
use crate::store::{BarStore, Source};
use crate::traits::validate_period;

/// Handle to a node of one [`SeriesGraph`].
///
/// Handles are cheap to copy and only valid with the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesId {
    graph: u64,
    node: NodeIndex,
}

impl SeriesId {
    /// Position of the node in its arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.node.index()
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.node.index())
    }
}

/// Generates one builder method per binary operator.
macro_rules! binary_builders {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns `Error::UnknownSeries` if either handle is foreign.
            pub fn $name(&mut self, lhs: SeriesId, rhs: SeriesId) -> Result<SeriesId> {
                self.binary(BinaryOp::$op, lhs, rhs)
            }
        )*
    };
}

/// Generates one builder method per unary operator.
macro_rules! unary_builders {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns `Error::UnknownSeries` if the handle is foreign.
            pub fn $name(&mut self, input: SeriesId) -> Result<SeriesId> {
                self.unary(UnaryOp::$op, input)
            }
        )*
    };
}

/// Generates one builder method per windowed kernel.
macro_rules! window_builders {
    ($($(#[$doc:meta])* $name:ident => $kernel:ident;)*) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns `Error::UnknownSeries` if the handle is foreign and
            /// `Error::InvalidPeriod` if `length` is zero.
            pub fn $name(&mut self, input: SeriesId, length: usize) -> Result<SeriesId> {
                self.window(input, WindowKernel::$kernel, length)
            }
        )*
    };
}

/// Arena of lazily evaluated series.
///
/// Edges point from operand to dependent. Builders only ever add nodes, so
/// operands are never mutated and the graph stays acyclic. Each node caches
/// the last array it computed together with the [`CacheKey`] of the store
/// state it was computed from; a read at any other key recomputes.
///
/// # Example
///
/// ```
/// use lazy_ta_core::series::SeriesGraph;
/// use lazy_ta_core::store::{Bar, BarStore, Source};
///
/// let mut store = BarStore::new();
/// for (t, c) in [10.0, 11.0, 9.0].into_iter().enumerate() {
///     store.append(Bar::new(t as i64, c, c, c, c));
/// }
///
/// let mut graph = SeriesGraph::new();
/// let close = graph.source(Source::Close);
/// let avg = graph.sma(close, 3).unwrap();
/// let spread = graph.sub(close, avg).unwrap();
///
/// assert_eq!(graph.last(spread, &store).unwrap(), -1.0);
///
/// store.append(Bar::new(3, 12.0, 12.0, 12.0, 12.0));
/// let fresh = graph.to_array(spread, &store).unwrap();
/// assert_eq!(fresh.len(), 4);
/// assert!((fresh[3] - (12.0 - 32.0 / 3.0)).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct SeriesGraph {
    id: u64,
    graph: DiGraph<Node, ()>,
    recomputes: u64,
}

impl Default for SeriesGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self {
            id: NEXT.fetch_add(1, Ordering::Relaxed),
            graph: DiGraph::new(),
            recomputes: 0,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Total node evaluations performed so far.
    #[must_use]
    pub const fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// What `id` computes.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if the handle is foreign.
    pub fn kind(&self, id: SeriesId) -> Result<&NodeKind> {
        let node = self.check(id)?;
        Ok(&self.graph[node].kind)
    }

    fn check(&self, id: SeriesId) -> Result<NodeIndex> {
        if id.graph == self.id && self.graph.node_weight(id.node).is_some() {
            Ok(id.node)
        } else {
            Err(Error::UnknownSeries { id: id.index() })
        }
    }

    fn handle(&self, node: NodeIndex) -> SeriesId {
        SeriesId {
            graph: self.id,
            node,
        }
    }

    fn insert(&mut self, kind: NodeKind) -> Result<SeriesId> {
        let operands = kind
            .operands()
            .into_iter()
            .map(|id| self.check(id))
            .collect::<Result<Vec<_>>>()?;
        let node = self.graph.add_node(Node::new(kind));
        for operand in operands {
            self.graph.add_edge(operand, node, ());
        }
        log::trace!("added {} = {kind}", self.handle(node));
        Ok(self.handle(node))
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    /// Leaf reading `source` from the store.
    pub fn source(&mut self, source: Source) -> SeriesId {
        let node = self.graph.add_node(Node::new(NodeKind::Source(source)));
        self.handle(node)
    }

    /// Leaf holding `value` on every bar.
    pub fn constant(&mut self, value: f64) -> SeriesId {
        let node = self.graph.add_node(Node::new(NodeKind::Constant(value)));
        self.handle(node)
    }

    /// Element-wise `lhs op rhs`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if either handle is foreign.
    pub fn binary(&mut self, op: BinaryOp, lhs: SeriesId, rhs: SeriesId) -> Result<SeriesId> {
        self.insert(NodeKind::Binary { op, lhs, rhs })
    }

    /// Element-wise `op(input)`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if the handle is foreign.
    pub fn unary(&mut self, op: UnaryOp, input: SeriesId) -> Result<SeriesId> {
        self.insert(NodeKind::Unary { op, input })
    }

    /// The value `input` had `bars` bars ago.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if the handle is foreign.
    pub fn offset(&mut self, input: SeriesId, bars: usize) -> Result<SeriesId> {
        self.insert(NodeKind::Offset { input, bars })
    }

    /// Windowed reduction of `input`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if the handle is foreign and
    /// `Error::InvalidPeriod` if `length` is zero.
    pub fn window(&mut self, input: SeriesId, kernel: WindowKernel, length: usize) -> Result<SeriesId> {
        validate_period(length)?;
        self.insert(NodeKind::Window {
            input,
            kernel,
            length,
        })
    }

    /// `lhs + value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if the handle is foreign.
    pub fn add_scalar(&mut self, lhs: SeriesId, value: f64) -> Result<SeriesId> {
        self.check(lhs)?;
        let rhs = self.constant(value);
        self.add(lhs, rhs)
    }

    /// `lhs - value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if the handle is foreign.
    pub fn sub_scalar(&mut self, lhs: SeriesId, value: f64) -> Result<SeriesId> {
        self.check(lhs)?;
        let rhs = self.constant(value);
        self.sub(lhs, rhs)
    }

    /// `lhs * value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if the handle is foreign.
    pub fn mul_scalar(&mut self, lhs: SeriesId, value: f64) -> Result<SeriesId> {
        self.check(lhs)?;
        let rhs = self.constant(value);
        self.mul(lhs, rhs)
    }

    /// `lhs / value`; a zero `value` gives `NaN` on every bar.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if the handle is foreign.
    pub fn div_scalar(&mut self, lhs: SeriesId, value: f64) -> Result<SeriesId> {
        self.check(lhs)?;
        let rhs = self.constant(value);
        self.div(lhs, rhs)
    }

    binary_builders! {
        /// `lhs + rhs`.
        add => Add;
        /// `lhs - rhs`.
        sub => Sub;
        /// `lhs * rhs`.
        mul => Mul;
        /// `lhs / rhs`, `NaN` where `rhs` is zero.
        div => Div;
        /// Smaller of the two.
        min => Min;
        /// Larger of the two.
        max => Max;
        /// `lhs > rhs` as `1.0`/`0.0`.
        gt => Gt;
        /// `lhs >= rhs` as `1.0`/`0.0`.
        ge => Ge;
        /// `lhs < rhs` as `1.0`/`0.0`.
        lt => Lt;
        /// `lhs <= rhs` as `1.0`/`0.0`.
        le => Le;
        /// `lhs == rhs` as `1.0`/`0.0`.
        eq => Eq;
        /// `lhs != rhs` as `1.0`/`0.0`.
        ne => Ne;
        /// Logical and.
        and => And;
        /// Logical or.
        or => Or;
    }

    unary_builders! {
        /// Negation.
        neg => Neg;
        /// Absolute value.
        abs => Abs;
        /// Logical not.
        not => Not;
        /// Square root.
        sqrt => Sqrt;
        /// Natural logarithm.
        ln => Ln;
    }

    window_builders! {
        /// Rolling sum.
        sum => Sum;
        /// Simple moving average.
        sma => Sma;
        /// Exponential moving average.
        ema => Ema;
        /// Wilder's moving average.
        rma => Rma;
        /// Weighted moving average.
        wma => Wma;
        /// Population standard deviation.
        stdev => StdDev;
        /// Highest value.
        highest => Highest;
        /// Lowest value.
        lowest => Lowest;
        /// Linear regression value.
        linreg => LinReg;
        /// Difference against `length` bars back.
        change => Change;
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Values of `id` for the current state of `store`, one per bar.
    ///
    /// Served from cache when nothing changed since the last read;
    /// otherwise every stale node upstream of `id` is recomputed, operands
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if the handle is foreign,
    /// `Error::StaleSnapshot` if a materialized node upstream was captured
    /// at another store state, and any kernel error.
    pub fn values(&mut self, id: SeriesId, store: &BarStore) -> Result<&[f64]> {
        let target = self.check(id)?;
        let key = CacheKey::of(store);
        if self.graph[target].fresh(key).is_none() {
            self.evaluate(target, store, key)?;
        }
        self.graph[target]
            .fresh(key)
            .ok_or(Error::UnknownSeries { id: id.index() })
    }

    /// Owned copy of [`SeriesGraph::values`].
    ///
    /// # Errors
    ///
    /// Same as [`SeriesGraph::values`].
    pub fn to_array(&mut self, id: SeriesId, store: &BarStore) -> Result<Vec<f64>> {
        Ok(self.values(id, store)?.to_vec())
    }

    /// Value at the most recent bar (`NaN` for an empty store).
    ///
    /// # Errors
    ///
    /// Same as [`SeriesGraph::values`].
    pub fn last(&mut self, id: SeriesId, store: &BarStore) -> Result<f64> {
        Ok(self.values(id, store)?.last().copied().unwrap_or(f64::NAN))
    }

    /// Captures the current values of `id` in a new leaf with no upstream.
    ///
    /// The snapshot reads exactly like `id` at the current store state. At
    /// any other state it fails with `Error::StaleSnapshot`; rebuild it from
    /// the original node instead.
    ///
    /// # Errors
    ///
    /// Same as [`SeriesGraph::values`].
    pub fn materialize(&mut self, id: SeriesId, store: &BarStore) -> Result<SeriesId> {
        let key = CacheKey::of(store);
        let values = self.values(id, store)?.to_vec();
        let mut node = Node::new(NodeKind::Snapshot { captured: key });
        node.cache = Some(Cache { key, values });
        let node = self.graph.add_node(node);
        log::debug!("materialized {id} into {} at {key}", self.handle(node));
        Ok(self.handle(node))
    }

    /// Number of distinct nodes upstream of `id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownSeries` if the handle is foreign.
    pub fn dependency_count(&self, id: SeriesId) -> Result<usize> {
        let start = self.check(id)?;
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut count = 0_usize;
        while dfs.next(reversed).is_some() {
            count += 1;
        }
        Ok(count - 1)
    }

    fn evaluate(&mut self, target: NodeIndex, store: &BarStore, key: CacheKey) -> Result<()> {
        // post-order over the reversed graph visits operands before dependents
        let reversed = Reversed(&self.graph);
        let mut dfs = DfsPostOrder::new(reversed, target);
        let mut order = Vec::new();
        while let Some(node) = dfs.next(reversed) {
            order.push(node);
        }
        log::debug!(
            "evaluating {} at {key}: {} nodes in subgraph",
            self.handle(target),
            order.len()
        );

        for node in order {
            if self.graph[node].fresh(key).is_some() {
                continue;
            }
            let values = self.compute(node, store, key)?;
            log::trace!("computed {} = {}", self.handle(node), self.graph[node].kind);
            self.graph[node].cache = Some(Cache { key, values });
            self.recomputes += 1;
        }
        Ok(())
    }

    fn operand(&self, id: SeriesId, key: CacheKey) -> Result<&[f64]> {
        self.graph[id.node]
            .fresh(key)
            .ok_or(Error::UnknownSeries { id: id.index() })
    }

    fn compute(&self, node: NodeIndex, store: &BarStore, key: CacheKey) -> Result<Vec<f64>> {
        Ok(match self.graph[node].kind {
            NodeKind::Source(source) => store.extract(source),
            NodeKind::Constant(value) => vec![value; store.len()],
            NodeKind::Snapshot { captured } => {
                return Err(Error::StaleSnapshot {
                    captured: captured.version,
                    current: key.version,
                });
            }
            NodeKind::Binary { op, lhs, rhs } => {
                let a = self.operand(lhs, key)?;
                let b = self.operand(rhs, key)?;
                a.iter().zip(b).map(|(&x, &y)| op.eval(x, y)).collect()
            }
            NodeKind::Unary { op, input } => self
                .operand(input, key)?
                .iter()
                .map(|&x| op.eval(x))
                .collect(),
            NodeKind::Offset { input, bars } => shift(self.operand(input, key)?, bars),
            NodeKind::Window {
                input,
                kernel,
                length,
            } => kernel.apply(self.operand(input, key)?, length)?,
        })
    }
}
