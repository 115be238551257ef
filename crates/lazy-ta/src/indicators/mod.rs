//! Indicators assembled from the series engine, the kernels and the
//! sequential state machines.
//!
//! Every indicator implements [`Indicator`]: it declares its inputs and
//! turns a bar slice into named plots. Plots are always exactly as long as
//! the bar slice and aligned with it by position; `NaN` marks bars where the
//! value is undefined.
//!
//! | Name             | Plots                              | Built on                     |
//! |------------------|------------------------------------|------------------------------|
//! | `moving_average` | `ma`                               | series engine / [`MaKind`]   |
//! | `bollinger`      | `basis`, `upper`, `lower`          | series engine                |
//! | `parabolic_sar`  | `sar`                              | [`ParabolicSar`] fold        |
//! | `supertrend`     | `supertrend`, `direction`          | [`Supertrend`] fold          |
//! | `mcginley`       | `mcginley`                         | [`McGinley`] fold            |
//! | `zigzag`         | `zigzag`, `extension`              | [`ZigZag`] fold              |
//!
//! [`MaKind`]: crate::smoothing::MaKind
//! [`ParabolicSar`]: crate::trend::ParabolicSar
//! [`Supertrend`]: crate::trend::Supertrend
//! [`McGinley`]: crate::smoothing::McGinley
//! [`ZigZag`]: crate::pivot::ZigZag

pub mod bollinger;
pub mod mcginley;
pub mod moving_average;
pub mod sar;
pub mod supertrend;
pub mod zigzag;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lazy_ta_core::store::Bar;
use lazy_ta_core::traits::validate_same_length;
use lazy_ta_core::Result;

use crate::inputs::{InputSpec, InputValues};

pub use bollinger::BollingerBands;
pub use mcginley::McGinleyDynamic;
pub use moving_average::MovingAverage;
pub use sar::ParabolicSarIndicator;
pub use supertrend::SupertrendIndicator;
pub use zigzag::ZigZagIndicator;

/// An indicator the registry can configure and run.
pub trait Indicator: Send + Sync {
    /// Registry key, e.g. `"bollinger"`.
    fn name(&self) -> &'static str;

    /// Display title.
    fn title(&self) -> &'static str;

    /// Configurable inputs with their defaults.
    fn inputs(&self) -> Vec<InputSpec>;

    /// Computes every plot over `bars`.
    ///
    /// # Errors
    ///
    /// Returns an error if an input is missing or invalid for this
    /// indicator. Insufficient history is not an error; it shows up as
    /// `NaN` points.
    fn calculate(&self, bars: &[Bar], inputs: &InputValues) -> Result<IndicatorOutput>;
}

/// One plotted value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    /// Bar time the value belongs to.
    pub time: i64,
    /// The value, `NaN` when undefined; `null` in JSON.
    #[serde(with = "nan_as_null")]
    pub value: f64,
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

/// Named plots produced by one indicator run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorOutput {
    /// Plot id to points, one point per input bar.
    pub plots: BTreeMap<String, Vec<PlotPoint>>,
}

impl IndicatorOutput {
    /// An output with no plots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds plot `id`, pairing `values` with the bar times.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if `values` is not as long as `bars`.
    pub fn insert(&mut self, id: &str, bars: &[Bar], values: &[f64]) -> Result<()> {
        validate_same_length(&[("bars", bars.len()), (id, values.len())])?;
        let points = bars
            .iter()
            .zip(values)
            .map(|(bar, &value)| PlotPoint {
                time: bar.time,
                value,
            })
            .collect();
        self.plots.insert(id.to_string(), points);
        Ok(())
    }

    /// Builder form of [`IndicatorOutput::insert`].
    ///
    /// # Errors
    ///
    /// As [`IndicatorOutput::insert`].
    pub fn with_plot(mut self, id: &str, bars: &[Bar], values: &[f64]) -> Result<Self> {
        self.insert(id, bars, values)?;
        Ok(self)
    }

    /// Points of plot `id`.
    #[must_use]
    pub fn plot(&self, id: &str) -> Option<&[PlotPoint]> {
        self.plots.get(id).map(Vec::as_slice)
    }

    /// Values of plot `id`, without times.
    #[must_use]
    pub fn values(&self, id: &str) -> Option<Vec<f64>> {
        self.plot(id)
            .map(|points| points.iter().map(|p| p.value).collect())
    }

    /// Plot ids in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.plots.keys().map(String::as_str)
    }

    /// Number of bars covered; every plot has this length.
    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.plots.values().next().map_or(0, Vec::len)
    }
}
