//! Name-keyed lookup of the provided indicators.
//!
//! # Example
//!
//! ```
//! use lazy_ta::registry::Registry;
//! use lazy_ta_core::store::Bar;
//!
//! let bars: Vec<Bar> = (0..30)
//!     .map(|i| {
//!         let c = 100.0 + f64::from(i);
//!         Bar::new(i64::from(i), c, c + 1.0, c - 1.0, c)
//!     })
//!     .collect();
//!
//! let registry = Registry::with_builtin();
//! let out = registry.calculate("bollinger", &bars, [("length", "10")]).unwrap();
//! assert_eq!(out.plot("basis").unwrap().len(), 30);
//! ```

use std::collections::BTreeMap;

use lazy_ta_core::store::Bar;
use lazy_ta_core::{Error, Result};

use crate::indicators::{
    BollingerBands, Indicator, IndicatorOutput, McGinleyDynamic, MovingAverage,
    ParabolicSarIndicator, SupertrendIndicator, ZigZagIndicator,
};
use crate::inputs::InputValues;

/// Indicators by name.
#[derive(Default)]
pub struct Registry {
    indicators: BTreeMap<&'static str, Box<dyn Indicator>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.indicators.keys()).finish()
    }
}

impl Registry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every indicator this crate provides.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MovingAverage));
        registry.register(Box::new(BollingerBands));
        registry.register(Box::new(ParabolicSarIndicator));
        registry.register(Box::new(SupertrendIndicator));
        registry.register(Box::new(McGinleyDynamic));
        registry.register(Box::new(ZigZagIndicator));
        registry
    }

    /// Adds `indicator`, returning any previous one with the same name.
    pub fn register(&mut self, indicator: Box<dyn Indicator>) -> Option<Box<dyn Indicator>> {
        self.indicators.insert(indicator.name(), indicator)
    }

    /// Looks up an indicator.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownIndicator`.
    pub fn get(&self, name: &str) -> Result<&dyn Indicator> {
        self.indicators
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| Error::UnknownIndicator {
                name: name.to_string(),
            })
    }

    /// Registered names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.indicators.keys().copied().collect()
    }

    /// Resolves `overrides` against the indicator's inputs and runs it.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownIndicator`, input errors from
    /// [`InputValues::resolve`] and any error of the indicator itself.
    pub fn calculate<I, K, V>(&self, name: &str, bars: &[Bar], overrides: I) -> Result<IndicatorOutput>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let indicator = self.get(name)?;
        let inputs = InputValues::resolve(&indicator.inputs(), overrides)?;
        log::debug!("calculating {name} over {} bars", bars.len());
        indicator.calculate(bars, &inputs)
    }
}
