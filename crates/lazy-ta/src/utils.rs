//! Small numeric helpers shared by the state machines and tests.
//!
//! # Example
//!
//! ```
//! use lazy_ta::utils::{approx_eq, count_nan_prefix, EPSILON};
//!
//! assert!(approx_eq(1.0 / 3.0, 0.333_333_333_333_333, EPSILON));
//! assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
//! assert_eq!(count_nan_prefix(&[f64::NAN, f64::NAN, 1.0, f64::NAN]), 2);
//! ```

use lazy_ta_core::SeriesElement;

/// Tolerance for comparisons after a handful of operations.
pub const EPSILON: f64 = 1e-10;

/// Tolerance for comparisons after long recursions.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Whether `a` and `b` are within `tolerance`, treating two `NaN`s as equal.
#[inline]
#[must_use]
pub fn approx_eq<T: SeriesElement>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    (a - b).abs() <= tolerance
}

/// Number of leading `NaN` values, i.e. the warm-up length of an output.
#[must_use]
pub fn count_nan_prefix<T: SeriesElement>(data: &[T]) -> usize {
    data.iter().take_while(|x| x.is_nan()).count()
}

/// Converts a literal parameter default into `T`, `NaN` if it does not fit.
///
/// Parameter validation rejects the `NaN`, so an unrepresentable default
/// surfaces as an `InvalidParameter` error rather than a panic.
#[inline]
pub(crate) fn constant<T: SeriesElement>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(|_| T::nan())
}
