//! Supertrend indicator.

use lazy_ta_core::store::Bar;
use lazy_ta_core::Result;

use crate::indicators::{Indicator, IndicatorOutput};
use crate::inputs::{InputSpec, InputValues};
use crate::trend::Supertrend;

/// `supertrend`: the active band; `direction`: `1` up, `-1` down.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupertrendIndicator;

impl Indicator for SupertrendIndicator {
    fn name(&self) -> &'static str {
        "supertrend"
    }

    fn title(&self) -> &'static str {
        "Supertrend"
    }

    fn inputs(&self) -> Vec<InputSpec> {
        vec![
            InputSpec::int("atr_period", "ATR Length", 10).min(1.0),
            InputSpec::float("factor", "Factor", 3.0).min(0.01).step(0.01),
        ]
    }

    fn calculate(&self, bars: &[Bar], inputs: &InputValues) -> Result<IndicatorOutput> {
        let tracker = Supertrend::new()
            .atr_period(inputs.length("atr_period")?)
            .factor(inputs.float("factor")?);
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let points = tracker.compute(&high, &low, &close)?;

        let line: Vec<f64> = points.iter().map(|p| p.value).collect();
        let direction: Vec<f64> = points
            .iter()
            .map(|p| p.direction.map_or(f64::NAN, |d| f64::from(d.signum())))
            .collect();
        IndicatorOutput::new()
            .with_plot("supertrend", bars, &line)?
            .with_plot("direction", bars, &direction)
    }
}
