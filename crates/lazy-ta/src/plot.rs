//! Boundary to whatever draws the plots.
//!
//! Indicators never draw. A host implements [`PlotSink`] for its chart (or
//! file writer) and hands it to a [`PlotPublisher`], which keeps the sink's
//! set of series in step with successive [`IndicatorOutput`]s.

use std::collections::BTreeSet;

use lazy_ta_core::{Error, Result};

use crate::indicators::{IndicatorOutput, PlotPoint};

/// Something that displays or stores named point series.
pub trait PlotSink {
    /// Creates an empty series.
    fn add_series(&mut self, id: &str);

    /// Drops a series and its data.
    fn remove_series(&mut self, id: &str);

    /// Replaces the data of an existing series.
    fn set_data(&mut self, id: &str, points: &[PlotPoint]);
}

/// Publishes indicator outputs to an attached sink.
#[derive(Debug)]
pub struct PlotPublisher<S> {
    sink: Option<S>,
    active: BTreeSet<String>,
}

impl<S> Default for PlotPublisher<S> {
    fn default() -> Self {
        Self {
            sink: None,
            active: BTreeSet::new(),
        }
    }
}

impl<S: PlotSink> PlotPublisher<S> {
    /// A publisher with no sink attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `sink`, returning the previously attached one.
    ///
    /// The new sink starts with no series; the next publish adds them.
    pub fn attach(&mut self, sink: S) -> Option<S> {
        self.active.clear();
        self.sink.replace(sink)
    }

    /// Detaches and returns the sink.
    pub fn detach(&mut self) -> Option<S> {
        self.active.clear();
        self.sink.take()
    }

    /// Whether a sink is attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.sink.is_some()
    }

    /// The attached sink.
    #[must_use]
    pub const fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    /// Series ids currently present on the sink.
    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    /// Sends every plot of `output` to the sink.
    ///
    /// Plots published before but missing from `output` are removed; new
    /// ones are added before their data is set.
    ///
    /// # Errors
    ///
    /// Returns `Error::ChartContextMissing` if no sink is attached.
    pub fn publish(&mut self, output: &IndicatorOutput) -> Result<()> {
        let Some(sink) = self.sink.as_mut() else {
            let plot_id = output.ids().next().unwrap_or_default().to_string();
            return Err(Error::ChartContextMissing { plot_id });
        };

        let stale: Vec<String> = self
            .active
            .iter()
            .filter(|id| !output.plots.contains_key(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            log::debug!("removing plot {id}");
            sink.remove_series(&id);
            self.active.remove(&id);
        }

        for (id, points) in &output.plots {
            if self.active.insert(id.clone()) {
                sink.add_series(id);
            }
            sink.set_data(id, points);
        }
        Ok(())
    }
}
