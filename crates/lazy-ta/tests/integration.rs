//! End-to-end flows: store and series feeding indicators, registry to sink.

mod common;

use std::collections::BTreeMap;

use lazy_ta::indicators::bollinger::build_bands;
use lazy_ta::prelude::*;
use lazy_ta::{approx_eq, EPSILON};
use lazy_ta_core::series::SeriesGraph;

use common::{flat_bars, ranged_bars, W_SHAPE};

/// Sink that keeps the latest data per series, like a chart would.
#[derive(Debug, Default)]
struct MemoryChart {
    series: BTreeMap<String, Vec<PlotPoint>>,
    removed: Vec<String>,
}

impl PlotSink for MemoryChart {
    fn add_series(&mut self, id: &str) {
        self.series.insert(id.to_string(), Vec::new());
    }

    fn remove_series(&mut self, id: &str) {
        self.series.remove(id);
        self.removed.push(id.to_string());
    }

    fn set_data(&mut self, id: &str, points: &[PlotPoint]) {
        if let Some(series) = self.series.get_mut(id) {
            *series = points.to_vec();
        }
    }
}

#[test]
fn registry_output_reaches_the_chart() {
    let registry = Registry::with_builtin();
    let bars = ranged_bars(&W_SHAPE);
    let mut publisher = PlotPublisher::new();
    publisher.attach(MemoryChart::default());

    let out = registry.calculate("zigzag", &bars, [("depth", "2")]).unwrap();
    publisher.publish(&out).unwrap();
    let chart = publisher.sink().unwrap();
    assert_eq!(
        chart.series.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["extension", "zigzag"]
    );
    assert_eq!(chart.series["zigzag"].len(), bars.len());

    // reconfiguring without the extension drops that series from the chart
    let out = registry
        .calculate("zigzag", &bars, [("depth", "2"), ("extend", "no")])
        .unwrap();
    publisher.publish(&out).unwrap();
    let chart = publisher.detach().unwrap();
    assert_eq!(chart.removed, vec!["extension".to_string()]);
    assert!(chart.series.contains_key("zigzag"));
}

#[test]
fn publishing_without_a_chart_fails() {
    let out = Registry::with_builtin()
        .calculate("parabolic_sar", &flat_bars(&[1.0, 2.0, 3.0]), std::iter::empty::<(&str, &str)>())
        .unwrap();
    let mut publisher = PlotPublisher::<MemoryChart>::new();
    assert!(matches!(
        publisher.publish(&out),
        Err(Error::ChartContextMissing { plot_id }) if plot_id == "sar"
    ));
}

#[test]
fn cached_bands_follow_store_mutations() {
    let mut store = BarStore::from_bars(flat_bars(&[10.0, 11.0, 9.0, 12.0]));
    let mut graph = SeriesGraph::new();
    let close = graph.source(Source::Close);
    let bands = build_bands(&mut graph, close, 3, 2.0).unwrap();

    let before = graph.to_array(bands.basis, &store).unwrap();
    assert_eq!(before.len(), 4);

    store.append(Bar::new(240, 8.0, 8.0, 8.0, 8.0));
    let after = graph.to_array(bands.basis, &store).unwrap();
    assert_eq!(after.len(), 5);
    assert!(approx_eq(after[4], (9.0 + 12.0 + 8.0) / 3.0, EPSILON));
    assert!(approx_eq(after[3], before[3], EPSILON));

    store.overwrite(4, Bar::new(240, 11.0, 11.0, 11.0, 11.0)).unwrap();
    let corrected = graph.to_array(bands.basis, &store).unwrap();
    assert!(approx_eq(corrected[4], (9.0 + 12.0 + 11.0) / 3.0, EPSILON));
}

#[test]
fn fold_consumes_series_output() {
    // a derived series (hl2 smoothed) drives the McGinley fold bar by bar
    let bars = ranged_bars(&W_SHAPE);
    let store = BarStore::from_bars(bars.iter().copied());
    let mut graph = SeriesGraph::new();
    let hl2 = graph.source(Source::Hl2);
    let smooth = graph.ema(hl2, 2).unwrap();
    let values = graph.to_array(smooth, &store).unwrap();

    let batch = McGinley::new(3).compute(&values).unwrap();
    assert_eq!(batch.len(), values.len());
    assert!(batch[..3].iter().all(|v| v.is_nan()));
    assert!(batch[3..].iter().all(|v| v.is_finite()));
}

#[test]
fn schemas_and_outputs_serialise() {
    let registry = Registry::with_builtin();
    let schema = serde_json::to_value(registry.get("bollinger").unwrap().inputs()).unwrap();
    let ids: Vec<&str> = schema
        .as_array()
        .unwrap()
        .iter()
        .map(|spec| spec["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["length", "source", "mult"]);
    assert_eq!(schema[1]["default"]["value"], "close");

    let out = registry
        .calculate("bollinger", &flat_bars(&[1.0, 2.0, 3.0]), [("length", "2")])
        .unwrap();
    let json = serde_json::to_string(&out).unwrap();
    let back: IndicatorOutput = serde_json::from_str(&json).unwrap();
    assert!(back.plot("basis").unwrap()[0].value.is_nan());
    assert!(approx_eq(back.plot("basis").unwrap()[2].value, 2.5, EPSILON));
}
