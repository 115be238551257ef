//! Configurable moving average.
//!
//! The windowed kinds are composed on a [`SeriesGraph`]; the recursive
//! kinds ([`MaKind::McGinley`], [`MaKind::Kama`]) run their folds over the
//! extracted column.

use lazy_ta_core::series::SeriesGraph;
use lazy_ta_core::store::{Bar, BarStore, Source};
use lazy_ta_core::traits::validate_period;
use lazy_ta_core::Result;

use crate::indicators::{Indicator, IndicatorOutput};
use crate::inputs::{InputSpec, InputValues};
use crate::smoothing::MaKind;

/// `ma`: the chosen average of the chosen source.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovingAverage;

impl Indicator for MovingAverage {
    fn name(&self) -> &'static str {
        "moving_average"
    }

    fn title(&self) -> &'static str {
        "Moving Average"
    }

    fn inputs(&self) -> Vec<InputSpec> {
        let kinds: Vec<&str> = MaKind::ALL.iter().map(|k| k.name()).collect();
        vec![
            InputSpec::source("source", "Source", Source::Close),
            InputSpec::int("length", "Length", 20).min(1.0),
            InputSpec::string("ma_type", "Type", MaKind::Sma.name()).options(&kinds),
        ]
    }

    fn calculate(&self, bars: &[Bar], inputs: &InputValues) -> Result<IndicatorOutput> {
        let source = inputs.source("source")?;
        let length = inputs.length("length")?;
        let kind: MaKind = inputs.string("ma_type")?.parse()?;
        let values = moving_average(bars, source, kind, length)?;
        IndicatorOutput::new().with_plot("ma", bars, &values)
    }
}

/// Computes a `kind` average of `source` over `length` bars.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `length` is zero.
pub fn moving_average(bars: &[Bar], source: Source, kind: MaKind, length: usize) -> Result<Vec<f64>> {
    validate_period(length)?;
    let store = BarStore::from_bars(bars.iter().copied());
    let mut graph = SeriesGraph::new();
    let src = graph.source(source);
    let node = match kind {
        MaKind::Sma => graph.sma(src, length)?,
        MaKind::Ema => graph.ema(src, length)?,
        MaKind::Rma => graph.rma(src, length)?,
        MaKind::Wma => graph.wma(src, length)?,
        MaKind::Vwma => {
            let volume = graph.source(Source::Volume);
            let weighted = graph.mul(src, volume)?;
            let num = graph.sma(weighted, length)?;
            let den = graph.sma(volume, length)?;
            graph.div(num, den)?
        }
        MaKind::McGinley | MaKind::Kama => {
            let column = store.extract(source);
            let volume = store.extract(Source::Volume);
            return kind.apply(&column, &volume, length);
        }
    };
    graph.to_array(node, &store)
}
