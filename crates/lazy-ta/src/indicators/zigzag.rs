//! Zig-zag indicator.
//!
//! `zigzag` holds each confirmed pivot's price at its bar and `NaN`
//! elsewhere, so a host that connects the defined points draws the swing
//! lines. `extension` holds the unconfirmed leg from the last pivot to the
//! most recent bar and is only emitted when `extend` is on.

use lazy_ta_core::store::Bar;
use lazy_ta_core::Result;

use crate::indicators::{Indicator, IndicatorOutput};
use crate::inputs::{InputSpec, InputValues};
use crate::pivot::{PivotBar, ZigZag};

/// `zigzag` pivot prices and the optional `extension` leg.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZigZagIndicator;

impl Indicator for ZigZagIndicator {
    fn name(&self) -> &'static str {
        "zigzag"
    }

    fn title(&self) -> &'static str {
        "Zig Zag"
    }

    fn inputs(&self) -> Vec<InputSpec> {
        vec![
            InputSpec::float("deviation", "Price deviation for reversals (%)", 5.0)
                .min(0.00001)
                .max(100.0)
                .step(0.5),
            InputSpec::int("depth", "Pivot legs", 10).min(2.0),
            InputSpec::bool("allow_both", "Allow a high and a low pivot on one bar", false),
            InputSpec::bool("extend", "Extend to last bar", true),
        ]
    }

    fn calculate(&self, bars: &[Bar], inputs: &InputValues) -> Result<IndicatorOutput> {
        let detector = ZigZag::new()
            .deviation(inputs.float("deviation")?)
            .depth(inputs.length("depth")?)
            .allow_both_on_one_bar(inputs.bool("allow_both")?);
        let (state, _) = detector.compute(bars.iter().map(PivotBar::from_bar))?;

        let mut line = vec![f64::NAN; bars.len()];
        for pivot in state.pivots() {
            line[pivot.end.bar_index] = pivot.end.price;
        }
        log::debug!("zigzag: {} pivots over {} bars", state.pivots().len(), bars.len());

        let mut out = IndicatorOutput::new().with_plot("zigzag", bars, &line)?;
        if inputs.bool("extend")? {
            let mut extension = vec![f64::NAN; bars.len()];
            if let Some(leg) = state.extension() {
                extension[leg.start.bar_index] = leg.start.price;
                extension[leg.end.bar_index] = leg.end.price;
            }
            out.insert("extension", bars, &extension)?;
        }
        Ok(out)
    }
}
