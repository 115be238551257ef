//! McGinley Dynamic indicator.

use lazy_ta_core::store::{Bar, Source};
use lazy_ta_core::Result;

use crate::indicators::{Indicator, IndicatorOutput};
use crate::inputs::{InputSpec, InputValues};
use crate::smoothing::McGinley;

/// `mcginley`: the dynamic of the chosen source.
#[derive(Debug, Clone, Copy, Default)]
pub struct McGinleyDynamic;

impl Indicator for McGinleyDynamic {
    fn name(&self) -> &'static str {
        "mcginley"
    }

    fn title(&self) -> &'static str {
        "McGinley Dynamic"
    }

    fn inputs(&self) -> Vec<InputSpec> {
        vec![
            InputSpec::int("length", "Length", 14).min(1.0),
            InputSpec::source("source", "Source", Source::Close),
        ]
    }

    fn calculate(&self, bars: &[Bar], inputs: &InputValues) -> Result<IndicatorOutput> {
        let length = inputs.length("length")?;
        let source = inputs.source("source")?;
        let column: Vec<f64> = bars.iter().map(|b| b.value(source)).collect();
        let values = McGinley::new(length).compute(&column)?;
        IndicatorOutput::new().with_plot("mcginley", bars, &values)
    }
}
