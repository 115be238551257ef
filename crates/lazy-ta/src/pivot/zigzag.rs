//! Zig-zag reversal detection.
//!
//! Each incoming bar is buffered; once `2 * depth + 1` bars are held the
//! bar `depth` positions back becomes a candidate pivot. A high candidate
//! must be at least as high as every later buffered bar and strictly higher
//! than every earlier one (lows mirror this). A confirmed candidate then:
//!
//! - becomes the first pivot if there is none yet;
//! - extends the last pivot in place if it has the same direction and a
//!   more extreme price;
//! - starts a new pivot if it has the opposite direction and its deviation
//!   from the last pivot meets the threshold.
//!
//! Volume is accumulated bar by bar (with the same `depth` delay as the
//! candidate) and handed to whichever pivot is created or extended next.

use std::collections::VecDeque;

use lazy_ta_core::{Error, Result, SeriesElement};

use crate::fold::{run_with_state, Fold};
use crate::pivot::{ChartPoint, Pivot, PivotBar};
use crate::utils::constant;

/// What a bar did to the pivot list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZigZagEvent {
    /// Nothing changed.
    None,
    /// The first pivot was confirmed.
    Started,
    /// The last pivot moved to a more extreme price.
    Extended,
    /// A pivot in the opposite direction was appended.
    Reversed,
}

/// Zig-zag configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZigZag<T> {
    deviation: T,
    depth: usize,
    allow_both_on_one_bar: bool,
}

impl<T: SeriesElement> Default for ZigZag<T> {
    fn default() -> Self {
        Self {
            deviation: constant(5.0),
            depth: 10,
            allow_both_on_one_bar: false,
        }
    }
}

impl<T: SeriesElement> ZigZag<T> {
    /// Creates a detector with a 5 % threshold and depth 10.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum reversal, in percent.
    #[must_use]
    pub const fn deviation(mut self, deviation: T) -> Self {
        self.deviation = deviation;
        self
    }

    /// Sets the configured depth; the confirmation window is half of it.
    #[must_use]
    pub const fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Allows a high and a low pivot to be accepted on the same bar.
    #[must_use]
    pub const fn allow_both_on_one_bar(mut self, allow: bool) -> Self {
        self.allow_both_on_one_bar = allow;
        self
    }

    /// Bars on each side of a candidate, `max(2, depth / 2)`.
    #[must_use]
    pub fn effective_depth(&self) -> usize {
        (self.depth / 2).max(2)
    }

    /// Checks that the deviation is a finite, non-negative percentage.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter`.
    pub fn validate(&self) -> Result<()> {
        if !(self.deviation >= T::zero()) || self.deviation.is_infinite() {
            return Err(Error::InvalidParameter {
                name: "deviation",
                reason: "must be a finite, non-negative percentage".to_string(),
            });
        }
        Ok(())
    }

    /// Runs the detector over `bars` and returns the final state together
    /// with one event per bar.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidParameter` for a bad deviation.
    pub fn compute<I>(&self, bars: I) -> Result<(ZigZagState<T>, Vec<ZigZagEvent>)>
    where
        I: IntoIterator<Item = PivotBar<T>>,
    {
        self.validate()?;
        Ok(run_with_state(self, bars))
    }

    /// `true` if `data[p]` is a high (or low) pivot of the buffer.
    fn is_candidate(buffer: &VecDeque<PivotBar<T>>, p: usize, is_high: bool) -> bool {
        let price = |bar: &PivotBar<T>| if is_high { bar.high } else { bar.low };
        let value = price(&buffer[p]);
        if value.is_nan() {
            return false;
        }
        let later_ok = buffer.iter().skip(p + 1).all(|bar| {
            let v = price(bar);
            if is_high {
                v <= value
            } else {
                v >= value
            }
        });
        let earlier_ok = buffer.iter().take(p).all(|bar| {
            let v = price(bar);
            if is_high {
                v < value
            } else {
                v > value
            }
        });
        later_ok && earlier_ok
    }

    /// Offers a confirmed candidate to the pivot list.
    fn offer(&self, state: &mut ZigZagState<T>, is_high: bool, point: ChartPoint<T>) -> ZigZagEvent {
        if state.pivots.is_empty() {
            let volume = state.take_volume();
            state.pivots.push(Pivot {
                is_high,
                volume,
                start: point,
                end: point,
            });
            log::debug!("zigzag started at bar {} ({})", point.bar_index, kind(is_high));
            return ZigZagEvent::Started;
        }
        let Some(last) = state.pivots.last_mut() else {
            return ZigZagEvent::None;
        };

        if last.is_high == is_high {
            let more_extreme = if is_high {
                point.price > last.end.price
            } else {
                point.price < last.end.price
            };
            if !more_extreme {
                return ZigZagEvent::None;
            }
            last.end = point;
            last.volume = last.volume + std::mem::replace(&mut state.pending_volume, T::zero());
            log::trace!("zigzag extended {} to bar {}", kind(is_high), point.bar_index);
            return ZigZagEvent::Extended;
        }

        let base = last.end;
        let dev = deviation_percent(base.price, point.price);
        // Both branches are inclusive: a move of exactly the threshold
        // confirms. Each direction keeps its own comparator so either can
        // be made strict on its own.
        let accepted = if last.is_high {
            // high -> low: inclusive, the drop must reach -threshold
            dev <= -self.deviation
        } else {
            // low -> high: inclusive, the rise must reach threshold
            dev >= self.deviation
        };
        if !accepted {
            return ZigZagEvent::None;
        }
        let volume = state.take_volume();
        state.pivots.push(Pivot {
            is_high,
            volume,
            start: base,
            end: point,
        });
        log::debug!(
            "zigzag reversed to {} at bar {} ({:.2} %)",
            kind(is_high),
            point.bar_index,
            dev.to_f64_lossy()
        );
        ZigZagEvent::Reversed
    }
}

const fn kind(is_high: bool) -> &'static str {
    if is_high {
        "high"
    } else {
        "low"
    }
}

/// Percentage move from `base` to `price`.
#[inline]
fn deviation_percent<T: SeriesElement>(base: T, price: T) -> T {
    T::hundred() * (price - base) / base.abs()
}

/// Buffered bars, confirmed pivots and unassigned volume.
#[derive(Debug, Clone, PartialEq)]
pub struct ZigZagState<T> {
    buffer: VecDeque<PivotBar<T>>,
    bars_seen: usize,
    pivots: Vec<Pivot<T>>,
    pending_volume: T,
}

impl<T: SeriesElement> ZigZagState<T> {
    /// Confirmed pivots, oldest first.
    #[must_use]
    pub fn pivots(&self) -> &[Pivot<T>] {
        &self.pivots
    }

    /// Volume accumulated since the last pivot change.
    #[must_use]
    pub const fn pending_volume(&self) -> T {
        self.pending_volume
    }

    /// Consumes the state, keeping only the pivots.
    #[must_use]
    pub fn into_pivots(self) -> Vec<Pivot<T>> {
        self.pivots
    }

    /// Unconfirmed pivot from the last confirmed one to the most recent
    /// bar, in the opposite direction: the bar's low after a high pivot,
    /// its high after a low pivot. Never part of [`ZigZagState::pivots`].
    #[must_use]
    pub fn extension(&self) -> Option<Pivot<T>> {
        let last = self.pivots.last()?;
        let bar = self.buffer.back()?;
        let is_high = !last.is_high;
        Some(Pivot {
            is_high,
            volume: self.pending_volume,
            start: last.end,
            end: ChartPoint {
                time: bar.time,
                bar_index: self.bars_seen - 1,
                price: if is_high { bar.high } else { bar.low },
            },
        })
    }

    fn take_volume(&mut self) -> T {
        std::mem::replace(&mut self.pending_volume, T::zero())
    }
}

impl<T: SeriesElement> Fold for ZigZag<T> {
    type State = ZigZagState<T>;
    type Input = PivotBar<T>;
    type Output = ZigZagEvent;

    fn initial(&self) -> ZigZagState<T> {
        ZigZagState {
            buffer: VecDeque::with_capacity(2 * self.effective_depth() + 1),
            bars_seen: 0,
            pivots: Vec::new(),
            pending_volume: T::zero(),
        }
    }

    fn step(&self, mut state: ZigZagState<T>, bar: PivotBar<T>) -> (ZigZagState<T>, ZigZagEvent) {
        let depth = self.effective_depth();
        let window = 2 * depth + 1;

        state.buffer.push_back(bar);
        if state.buffer.len() > window {
            state.buffer.pop_front();
        }
        state.bars_seen += 1;

        let len = state.buffer.len();
        if len > depth {
            let delayed = state.buffer[len - 1 - depth].volume;
            if !delayed.is_nan() {
                state.pending_volume = state.pending_volume + delayed;
            }
        }
        if len < window {
            return (state, ZigZagEvent::None);
        }

        let p = len - 1 - depth;
        let candidate = state.buffer[p];
        let point = |price: T| ChartPoint {
            time: candidate.time,
            bar_index: state.bars_seen - 1 - depth,
            price,
        };
        let high_point = point(candidate.high);
        let low_point = point(candidate.low);

        let mut event = ZigZagEvent::None;
        let mut high_accepted = false;
        if Self::is_candidate(&state.buffer, p, true) {
            event = self.offer(&mut state, true, high_point);
            high_accepted = event != ZigZagEvent::None;
        }
        if (!high_accepted || self.allow_both_on_one_bar)
            && Self::is_candidate(&state.buffer, p, false)
        {
            let low_event = self.offer(&mut state, false, low_point);
            if low_event != ZigZagEvent::None {
                event = low_event;
            }
        }
        (state, event)
    }
}
