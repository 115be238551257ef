//! Throughput of the sequential state machines and the series engine.
//!
//! Run with: `cargo bench -p lazy-ta`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lazy_ta::pivot::{PivotBar, ZigZag};
use lazy_ta::prelude::*;
use lazy_ta_core::series::SeriesGraph;

/// Deterministic synthetic bars.
fn generate_bars(size: usize) -> Vec<Bar> {
    let mut price = 100.0_f64;
    (0..size)
        .map(|i| {
            let x = i as f64;
            price = (price + (x * 0.1).sin() * 2.0 + (x * 0.03).cos() * 1.5).max(10.0);
            let high = price + 1.0 + (x * 0.07).sin().abs();
            let low = price - 1.0 - (x * 0.05).cos().abs();
            let open = price + (x * 0.04).sin() * 0.3;
            let volume = 1_000_000.0 + (x * 1000.0).sin().abs() * 500_000.0;
            Bar::new(i as i64, open, high, low, price).with_volume(volume)
        })
        .collect()
}

const SIZES: &[usize] = &[1_000, 10_000, 100_000];

fn bench_zigzag(c: &mut Criterion) {
    let mut group = c.benchmark_group("zigzag");
    for &size in SIZES {
        let bars: Vec<PivotBar<f64>> = generate_bars(size).iter().map(PivotBar::from_bar).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &bars, |b, bars| {
            b.iter(|| ZigZag::new().depth(10).compute(black_box(bars.iter().copied())))
        });
    }
    group.finish();
}

fn bench_trend_trackers(c: &mut Criterion) {
    let mut group = c.benchmark_group("trend");
    for &size in SIZES {
        let bars = generate_bars(size);
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sar", size), &size, |b, _| {
            b.iter(|| ParabolicSar::new().compute(black_box(&high), black_box(&low)))
        });
        group.bench_with_input(BenchmarkId::new("supertrend", size), &size, |b, _| {
            b.iter(|| Supertrend::new().compute(black_box(&high), black_box(&low), black_box(&close)))
        });
    }
    group.finish();
}

fn bench_smoothers(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoothing");
    for &size in SIZES {
        let close: Vec<f64> = generate_bars(size).iter().map(|b| b.close).collect();
        let volume = vec![1.0; size];
        group.throughput(Throughput::Elements(size as u64));
        for kind in [MaKind::Ema, MaKind::McGinley, MaKind::Kama] {
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &close, |b, close| {
                b.iter(|| kind.apply(black_box(close), &volume, 14))
            });
        }
    }
    group.finish();
}

fn bench_series_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("series");
    for &size in SIZES {
        let store = BarStore::from_bars(generate_bars(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("bollinger_cold", size), &store, |b, store| {
            b.iter(|| {
                let mut graph = SeriesGraph::new();
                let close = graph.source(Source::Close);
                let basis = graph.sma(close, 20).unwrap();
                let dev = graph.stdev(close, 20).unwrap();
                let width = graph.mul_scalar(dev, 2.0).unwrap();
                let upper = graph.add(basis, width).unwrap();
                graph.to_array(upper, black_box(store)).unwrap()
            })
        });
        group.bench_with_input(BenchmarkId::new("cached_read", size), &store, |b, store| {
            let mut graph = SeriesGraph::new();
            let close = graph.source(Source::Close);
            let avg = graph.sma(close, 20).unwrap();
            graph.values(avg, store).unwrap();
            b.iter(|| graph.last(avg, black_box(store)).unwrap())
        });
    }
    group.finish();
}

fn bench_registry(c: &mut Criterion) {
    let registry = Registry::with_builtin();
    let bars = generate_bars(10_000);
    let mut group = c.benchmark_group("registry");
    group.throughput(Throughput::Elements(bars.len() as u64));
    for name in registry.names() {
        group.bench_function(name, |b| {
            b.iter(|| {
                registry
                    .calculate(name, black_box(&bars), std::iter::empty::<(&str, &str)>())
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_zigzag,
    bench_trend_trackers,
    bench_smoothers,
    bench_series_engine,
    bench_registry
);
criterion_main!(benches);
