//! Rolling-window indicators over value slices.
//!
//! All indicators produce an output aligned 1:1 with the input: positions
//! where the window is not yet filled, or where the window contains a
//! non-finite value, hold `f64::NAN`.

pub mod rolling;
pub mod sma;

pub use rolling::{rolling_mean, rolling_std};
pub use sma::sma;

#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "expected {expected}, got {actual} (diff {})",
        (actual - expected).abs()
    );
}
