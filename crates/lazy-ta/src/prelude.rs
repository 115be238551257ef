//! Commonly used types for glob import.
//!
//! ```
//! use lazy_ta::prelude::*;
//!
//! let sar = ParabolicSar::<f64>::new().maximum(0.1);
//! assert!(sar.validate().is_ok());
//! ```

pub use lazy_ta_core::store::{Bar, BarStore, Source};
pub use lazy_ta_core::{Error, Result, SeriesElement};

pub use crate::fold::{run, run_with_state, Fold};
pub use crate::indicators::{Indicator, IndicatorOutput, PlotPoint};
pub use crate::inputs::{InputKind, InputSpec, InputValue, InputValues};
pub use crate::pivot::{ChartPoint, Pivot, PivotBar, ZigZag, ZigZagEvent, ZigZagState};
pub use crate::plot::{PlotPublisher, PlotSink};
pub use crate::registry::Registry;
pub use crate::smoothing::{Kama, MaKind, McGinley};
pub use crate::trend::{ParabolicSar, Supertrend, TrendDirection};
