//! Invariants of the sequential state machines on random price paths.

mod common;

use lazy_ta::pivot::{PivotBar, ZigZag};
use lazy_ta::prelude::*;
use lazy_ta::trend::SarPoint;
use proptest::prelude::*;

use common::{arb_bars, high_low};

fn zigzag_state(bars: &[Bar], depth: usize, deviation: f64, allow_both: bool) -> ZigZagState<f64> {
    ZigZag::new()
        .depth(depth)
        .deviation(deviation)
        .allow_both_on_one_bar(allow_both)
        .compute(bars.iter().map(PivotBar::from_bar))
        .unwrap()
        .0
}

fn sar_points(bars: &[Bar]) -> Vec<SarPoint<f64>> {
    let (high, low) = high_low(bars);
    ParabolicSar::new().compute(&high, &low).unwrap()
}

// ==================== Zig-zag ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Confirmed pivots alternate and each leg meets the threshold.
    #[test]
    fn prop_pivots_alternate_and_meet_deviation(
        bars in arb_bars(10, 300),
        depth in 2usize..12,
        deviation in 0.5..10.0_f64,
        allow_both in any::<bool>(),
    ) {
        let state = zigzag_state(&bars, depth, deviation, allow_both);
        for pair in state.pivots().windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            prop_assert_ne!(prev.is_high, next.is_high);
            prop_assert_eq!(next.start, prev.end);
            prop_assert!(next.end.bar_index >= prev.end.bar_index);

            let dev = 100.0 * (next.end.price - prev.end.price) / prev.end.price.abs();
            if next.is_high {
                prop_assert!(dev >= deviation - 1e-9, "rise {} < {}", dev, deviation);
            } else {
                prop_assert!(dev <= -deviation + 1e-9, "drop {} > -{}", dev, deviation);
            }
        }
    }

    /// Every pivot sits on the extreme of its own bar.
    #[test]
    fn prop_pivot_prices_come_from_their_bars(bars in arb_bars(10, 200), depth in 2usize..10) {
        let state = zigzag_state(&bars, depth, 1.0, false);
        for pivot in state.pivots() {
            let bar = bars[pivot.end.bar_index];
            prop_assert_eq!(pivot.end.time, bar.time);
            let expected = if pivot.is_high { bar.high } else { bar.low };
            prop_assert_eq!(pivot.end.price, expected);
        }
    }

    /// Volume handed to pivots never exceeds what was traded.
    #[test]
    fn prop_pivot_volume_is_conserved(bars in arb_bars(10, 200), depth in 2usize..10) {
        let state = zigzag_state(&bars, depth, 1.0, false);
        let assigned: f64 = state.pivots().iter().map(|p| p.volume).sum::<f64>()
            + state.pending_volume();
        let traded: f64 = bars.iter().map(Bar::volume_or_zero).sum();
        prop_assert!(assigned <= traded + 1e-6);
        prop_assert!(state.pivots().iter().all(|p| p.volume >= 0.0));
    }

    /// Feeding more bars never rewrites pivots that already have a successor.
    #[test]
    fn prop_pivots_are_causal(bars in arb_bars(20, 200), cut in 0.0..1.0_f64, depth in 2usize..8) {
        let n = ((bars.len() as f64) * cut) as usize;
        let prefix = zigzag_state(&bars[..n], depth, 2.0, false);
        let full = zigzag_state(&bars, depth, 2.0, false);
        let settled = prefix.pivots().len().saturating_sub(1);
        prop_assert!(full.pivots().len() >= prefix.pivots().len());
        prop_assert_eq!(&prefix.pivots()[..settled], &full.pivots()[..settled]);
        if let Some(last) = prefix.pivots().last() {
            let same = full.pivots()[settled];
            prop_assert_eq!(last.is_high, same.is_high);
            prop_assert_eq!(last.start, same.start);
        }
    }

    /// The extension leg points the other way and is never stored.
    #[test]
    fn prop_extension_is_opposite_and_unstored(bars in arb_bars(10, 200)) {
        let state = zigzag_state(&bars, 4, 1.0, false);
        if let Some(ext) = state.extension() {
            let last = state.pivots().last().copied().unwrap();
            prop_assert_ne!(ext.is_high, last.is_high);
            prop_assert_eq!(ext.start, last.end);
            prop_assert_eq!(ext.end.bar_index, bars.len() - 1);
            prop_assert!(!state.pivots().contains(&ext));
        }
    }
}

// ==================== Parabolic SAR ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// AF resets on every flip and otherwise only grows, up to the maximum.
    #[test]
    fn prop_sar_af_resets_then_rises(bars in arb_bars(3, 300)) {
        let points = sar_points(&bars);
        for pair in points.windows(2).skip(1) {
            let (prev, next) = (pair[0], pair[1]);
            prop_assert!(next.af >= 0.02 - 1e-12 && next.af <= 0.2 + 1e-12);
            if next.direction == prev.direction {
                prop_assert!(next.af >= prev.af);
            } else {
                prop_assert!((next.af - 0.02).abs() < 1e-12);
            }
        }
        if let Some(first) = points.get(1) {
            prop_assert!((first.af - 0.02).abs() < 1e-12);
        }
    }

    /// After the seed bar the stop never sits inside the bar's range on the
    /// wrong side.
    #[test]
    fn prop_sar_stays_outside_price(bars in arb_bars(3, 300)) {
        let points = sar_points(&bars);
        for (point, bar) in points.iter().zip(&bars).skip(2) {
            match point.direction {
                Some(TrendDirection::Up) => prop_assert!(point.value <= bar.low),
                Some(TrendDirection::Down) => prop_assert!(point.value >= bar.high),
                None => prop_assert!(false, "defined bars always have a direction"),
            }
        }
    }

    /// The extreme point only improves while the trend holds.
    #[test]
    fn prop_sar_extreme_ratchets(bars in arb_bars(3, 300)) {
        let points = sar_points(&bars);
        for pair in points.windows(2).skip(1) {
            let (prev, next) = (pair[0], pair[1]);
            match (prev.direction, next.direction) {
                (Some(TrendDirection::Up), Some(TrendDirection::Up)) => {
                    prop_assert!(next.extreme >= prev.extreme);
                }
                (Some(TrendDirection::Down), Some(TrendDirection::Down)) => {
                    prop_assert!(next.extreme <= prev.extreme);
                }
                _ => {}
            }
        }
    }
}

// ==================== Supertrend and smoothers ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// While the trend holds, the close stays on the trend side of the line.
    #[test]
    fn prop_supertrend_close_on_trend_side(bars in arb_bars(5, 300), period in 1usize..15) {
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let points = Supertrend::new().atr_period(period).compute(&high, &low, &close).unwrap();
        for (i, pair) in points.windows(2).enumerate() {
            let c = close[i + 1];
            match (pair[0].direction, pair[1].direction) {
                (Some(TrendDirection::Up), Some(TrendDirection::Up)) => {
                    prop_assert!(c >= pair[1].value);
                }
                (Some(TrendDirection::Down), Some(TrendDirection::Down)) => {
                    prop_assert!(c <= pair[1].value);
                }
                _ => {}
            }
        }
    }

    /// Positive prices give finite averages once warmed up.
    #[test]
    fn prop_smoothers_finite_after_warm_up(bars in arb_bars(30, 200), length in 1usize..20) {
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volume: Vec<f64> = bars.iter().map(Bar::volume_or_zero).collect();
        for kind in [MaKind::McGinley, MaKind::Kama] {
            let out = kind.apply(&close, &volume, length).unwrap();
            prop_assert_eq!(out.len(), close.len());
            prop_assert!(out[length..].iter().all(|v| v.is_finite()), "{}", kind);
        }
    }

    /// Every registered indicator emits plots aligned with the bars.
    #[test]
    fn prop_indicator_plots_are_aligned(bars in arb_bars(0, 120)) {
        let registry = Registry::with_builtin();
        for name in registry.names() {
            let out = registry
                .calculate(name, &bars, std::iter::empty::<(&str, &str)>())
                .unwrap();
            for points in out.plots.values() {
                prop_assert_eq!(points.len(), bars.len());
                for (point, bar) in points.iter().zip(&bars) {
                    prop_assert_eq!(point.time, bar.time);
                }
            }
        }
    }
}
