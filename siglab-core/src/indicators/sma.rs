//! Simple Moving Average (SMA).
//!
//! Rolling mean of a price series over a lookback window. The first valid
//! value appears at index `window - 1`.

use super::rolling::rolling_mean;

/// Simple moving average over `window` periods.
pub fn sma(values: &[f64], window: usize) -> Vec<f64> {
    rolling_mean(values, window)
}
