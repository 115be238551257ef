//! Moving averages: the recursive smoothers and the closed set of kinds an
//! indicator can be configured with.
//!
//! [`MaKind`] is parsed once from its display name when an indicator is
//! configured and then applied to whole arrays, so no per-bar dispatch on
//! strings ever happens.
//!
//! # Example
//!
//! ```
//! use lazy_ta::smoothing::MaKind;
//!
//! let kind: MaKind = "EMA".parse().unwrap();
//! let close = [2.0_f64, 4.0, 6.0, 8.0];
//! let volume = [1.0_f64; 4];
//! let out = kind.apply(&close, &volume, 3).unwrap();
//! assert!((out[3] - 6.0).abs() < 1e-12);
//! ```

pub mod kama;
pub mod mcginley;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use lazy_ta_core::kernels::{ema, rma, sma, wma};
use lazy_ta_core::traits::{validate_period, validate_same_length};
use lazy_ta_core::{Error, Result, SeriesElement};

pub use kama::{Kama, KamaFold, KamaState};
pub use mcginley::{McGinley, McGinleyFold, McGinleyInput};

/// A moving-average strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaKind {
    /// Simple.
    #[serde(rename = "SMA")]
    Sma,
    /// Exponential.
    #[serde(rename = "EMA")]
    Ema,
    /// Wilder's smoothed.
    #[serde(rename = "RMA")]
    Rma,
    /// Linearly weighted.
    #[serde(rename = "WMA")]
    Wma,
    /// Volume weighted.
    #[serde(rename = "VWMA")]
    Vwma,
    /// McGinley dynamic.
    #[serde(rename = "McGinley")]
    McGinley,
    /// Kaufman adaptive.
    #[serde(rename = "KAMA")]
    Kama,
}

impl MaKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 7] = [
        Self::Sma,
        Self::Ema,
        Self::Rma,
        Self::Wma,
        Self::Vwma,
        Self::McGinley,
        Self::Kama,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sma => "SMA",
            Self::Ema => "EMA",
            Self::Rma => "RMA",
            Self::Wma => "WMA",
            Self::Vwma => "VWMA",
            Self::McGinley => "McGinley",
            Self::Kama => "KAMA",
        }
    }

    /// Whether the kind reads the volume column.
    #[must_use]
    pub const fn needs_volume(self) -> bool {
        matches!(self, Self::Vwma)
    }

    /// Averages `source` over `length` bars. `volume` is only read by
    /// [`MaKind::Vwma`] but must be as long as `source`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeriod` if `length` is zero and
    /// `Error::LengthMismatch` if the columns differ in length.
    pub fn apply<T: SeriesElement>(self, source: &[T], volume: &[T], length: usize) -> Result<Vec<T>> {
        validate_period(length)?;
        validate_same_length(&[("source", source.len()), ("volume", volume.len())])?;
        match self {
            Self::Sma => sma(source, length),
            Self::Ema => ema(source, length),
            Self::Rma => rma(source, length),
            Self::Wma => wma(source, length),
            Self::Vwma => vwma(source, volume, length),
            Self::McGinley => McGinley::new(length).compute(source),
            Self::Kama => Kama::new(length).compute(source),
        }
    }
}

impl fmt::Display for MaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidInput {
                id: "ma_type".to_string(),
                reason: format!("unknown moving average '{s}'"),
            })
    }
}

/// Volume-weighted moving average, `sma(x * v) / sma(v)`.
///
/// Bars where the windowed volume is zero are `NaN`.
///
/// # Errors
///
/// Returns `Error::InvalidPeriod` if `length` is zero and
/// `Error::LengthMismatch` if the columns differ in length.
pub fn vwma<T: SeriesElement>(source: &[T], volume: &[T], length: usize) -> Result<Vec<T>> {
    validate_same_length(&[("source", source.len()), ("volume", volume.len())])?;
    let weighted: Vec<T> = source.iter().zip(volume).map(|(&x, &v)| x * v).collect();
    let num = sma(&weighted, length)?;
    let den = sma(volume, length)?;
    Ok(num
        .into_iter()
        .zip(den)
        .map(|(n, d)| if d == T::zero() { T::nan() } else { n / d })
        .collect())
}
