//! Trend-flip trackers.
//!
//! Both trackers carry a direction and a trailing level that follows price
//! and flips sides when price crosses it. They are inherently sequential:
//! every bar depends on the level and direction of the bar before, so the
//! only implementation is a [`Fold`](crate::fold::Fold) run first to last.

pub mod sar;
pub mod supertrend;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use sar::{HighLow, ParabolicSar, SarPoint, SarState};
pub use supertrend::{Supertrend, SupertrendInput, SupertrendPoint, SupertrendState};

/// Side of the market a tracker is following.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Rising market; the level trails below price.
    Up,
    /// Falling market; the level trails above price.
    Down,
}

impl TrendDirection {
    /// `+1` for up, `-1` for down.
    #[must_use]
    pub const fn signum(self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// The other direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Whether this is [`TrendDirection::Up`].
    #[must_use]
    pub const fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_helpers() {
        assert_eq!(TrendDirection::Up.signum(), 1);
        assert_eq!(TrendDirection::Down.signum(), -1);
        assert_eq!(TrendDirection::Up.flipped(), TrendDirection::Down);
        assert!(!TrendDirection::Down.is_up());
        assert_eq!(TrendDirection::Down.to_string(), "down");
    }
}
