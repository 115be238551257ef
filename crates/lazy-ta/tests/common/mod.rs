//! Shared fixtures for the lazy-ta integration tests.

use lazy_ta::prelude::*;
use proptest::prelude::*;

/// Bars whose open, high, low and close all equal `close`, one minute apart.
#[allow(dead_code)]
pub fn flat_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(i as i64 * 60, c, c, c, c))
        .collect()
}

/// Bars with a half-point range around each close and unit volume.
#[allow(dead_code)]
pub fn ranged_bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(i as i64 * 60, c, c + 0.5, c - 0.5, c).with_volume(1.0))
        .collect()
}

/// Twelve closes tracing a W: down to 13, up to 17, down to 13, up to 18.
#[allow(dead_code)]
pub const W_SHAPE: [f64; 12] = [
    20.0, 19.0, 17.0, 15.0, 13.0, 15.0, 17.0, 15.0, 13.0, 15.0, 17.0, 18.0,
];

/// Random-walk OHLCV bars with strictly positive prices.
#[allow(dead_code)]
pub fn arb_bars(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec(
        (-0.05..0.05_f64, 0.0..0.02_f64, 0.0..0.02_f64, 0.0..1000.0_f64),
        min_len..=max_len,
    )
    .prop_map(|steps| {
        let mut price = 100.0_f64;
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (step, up, down, volume))| {
                let open = price;
                price *= 1.0 + step;
                let close = price;
                let high = open.max(close) * (1.0 + up);
                let low = open.min(close) * (1.0 - down);
                Bar::new(i as i64, open, high, low, close).with_volume(volume)
            })
            .collect()
    })
}

/// High and low columns of `bars`.
#[allow(dead_code)]
pub fn high_low(bars: &[Bar]) -> (Vec<f64>, Vec<f64>) {
    (
        bars.iter().map(|b| b.high).collect(),
        bars.iter().map(|b| b.low).collect(),
    )
}
