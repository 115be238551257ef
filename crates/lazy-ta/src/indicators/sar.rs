//! Parabolic SAR indicator.

use lazy_ta_core::store::{Bar, Source};
use lazy_ta_core::Result;

use crate::indicators::{Indicator, IndicatorOutput};
use crate::inputs::{InputSpec, InputValues};
use crate::trend::ParabolicSar;

/// `sar`: the stop-and-reverse level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParabolicSarIndicator;

impl Indicator for ParabolicSarIndicator {
    fn name(&self) -> &'static str {
        "parabolic_sar"
    }

    fn title(&self) -> &'static str {
        "Parabolic SAR"
    }

    fn inputs(&self) -> Vec<InputSpec> {
        vec![
            InputSpec::float("start", "Start", 0.02).min(0.0).step(0.001),
            InputSpec::float("increment", "Increment", 0.02).min(0.0).step(0.001),
            InputSpec::float("maximum", "Max value", 0.2).min(0.0).step(0.01),
        ]
    }

    fn calculate(&self, bars: &[Bar], inputs: &InputValues) -> Result<IndicatorOutput> {
        let sar = ParabolicSar::new()
            .start(inputs.float("start")?)
            .increment(inputs.float("increment")?)
            .maximum(inputs.float("maximum")?);
        let high: Vec<f64> = bars.iter().map(|b| b.value(Source::High)).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.value(Source::Low)).collect();
        let values: Vec<f64> = sar.compute(&high, &low)?.iter().map(|p| p.value).collect();
        IndicatorOutput::new().with_plot("sar", bars, &values)
    }
}
