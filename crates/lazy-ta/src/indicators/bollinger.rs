//! Bollinger Bands as a series-engine composition.
//!
//! ```text
//! basis = sma(source, length)
//! upper = basis + mult * stdev(source, length)
//! lower = basis - mult * stdev(source, length)
//! ```
//!
//! The deviation is the population standard deviation.

use lazy_ta_core::series::{SeriesGraph, SeriesId};
use lazy_ta_core::store::{Bar, BarStore, Source};
use lazy_ta_core::{Error, Result};

use crate::indicators::{Indicator, IndicatorOutput};
use crate::inputs::{InputSpec, InputValues};

/// `basis`, `upper` and `lower` bands.
#[derive(Debug, Clone, Copy, Default)]
pub struct BollingerBands;

/// Node handles of the three bands inside a [`SeriesGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandNodes {
    /// Moving average.
    pub basis: SeriesId,
    /// Basis plus the scaled deviation.
    pub upper: SeriesId,
    /// Basis minus the scaled deviation.
    pub lower: SeriesId,
}

/// Adds the band nodes for `input` to `graph`.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` for a zero length and
/// `Error::InvalidParameter` for a negative or non-finite multiplier.
pub fn build_bands(graph: &mut SeriesGraph, input: SeriesId, length: usize, mult: f64) -> Result<BandNodes> {
    if !(mult >= 0.0) || mult.is_infinite() {
        return Err(Error::InvalidParameter {
            name: "mult",
            reason: format!("{mult} is not a finite, non-negative multiplier"),
        });
    }
    let basis = graph.sma(input, length)?;
    let dev = graph.stdev(input, length)?;
    let width = graph.mul_scalar(dev, mult)?;
    let upper = graph.add(basis, width)?;
    let lower = graph.sub(basis, width)?;
    Ok(BandNodes { basis, upper, lower })
}

impl Indicator for BollingerBands {
    fn name(&self) -> &'static str {
        "bollinger"
    }

    fn title(&self) -> &'static str {
        "Bollinger Bands"
    }

    fn inputs(&self) -> Vec<InputSpec> {
        vec![
            InputSpec::int("length", "Length", 20).min(1.0),
            InputSpec::source("source", "Source", Source::Close),
            InputSpec::float("mult", "StdDev", 2.0).min(0.001).max(50.0).step(0.1),
        ]
    }

    fn calculate(&self, bars: &[Bar], inputs: &InputValues) -> Result<IndicatorOutput> {
        let length = inputs.length("length")?;
        let source = inputs.source("source")?;
        let mult = inputs.float("mult")?;

        let store = BarStore::from_bars(bars.iter().copied());
        let mut graph = SeriesGraph::new();
        let src = graph.source(source);
        let bands = build_bands(&mut graph, src, length, mult)?;

        let mut out = IndicatorOutput::new();
        for (id, node) in [("basis", bands.basis), ("upper", bands.upper), ("lower", bands.lower)] {
            let values = graph.to_array(node, &store)?;
            out.insert(id, bars, &values)?;
        }
        log::debug!(
            "bollinger({length}, {mult}) over {} bars, {} nodes evaluated",
            bars.len(),
            graph.recompute_count()
        );
        Ok(out)
    }
}
