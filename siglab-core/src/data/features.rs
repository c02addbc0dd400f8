//! Derived feature columns: returns, rolling volatility, z-scores.
//!
//! `add_basic_features` is the canonical preprocessing step between raw
//! candles and signal generation. Output columns:
//! - `ret`: simple return, `p[t]/p[t-1] - 1` (NaN at t = 0)
//! - `log_ret`: `ln(p[t]) - ln(p[t-1])` (NaN at t = 0)
//! - `vol_{w}`: rolling sample std of `log_ret` over `vol_window` periods
//! - `zret_{w}`: z-score of `ret` against its own rolling mean/std

use super::frame::{FeatureFrame, FrameError};
use crate::indicators::{rolling_mean, rolling_std};

/// Parameters for feature derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureParams {
    /// Price column the returns are computed from.
    pub price_col: String,
    /// Rolling window for the volatility column.
    pub vol_window: usize,
    /// Rolling window for the return z-score column.
    pub z_window: usize,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            price_col: "close".to_string(),
            vol_window: 24,
            z_window: 24,
        }
    }
}

/// Appends derived feature columns to a copy of `frame`.
///
/// Fails before any computation if the price column is absent.
pub fn add_basic_features(
    frame: &FeatureFrame,
    params: &FeatureParams,
) -> Result<FeatureFrame, FrameError> {
    let price = frame.column(&params.price_col)?.to_vec();

    let ret = pct_change(&price);
    let log_ret = log_diff(&price);
    let vol = rolling_std(&log_ret, params.vol_window);

    let ret_mean = rolling_mean(&ret, params.z_window);
    let ret_std = rolling_std(&ret, params.z_window);
    let zret: Vec<f64> = ret
        .iter()
        .zip(ret_mean.iter().zip(ret_std.iter()))
        .map(|(r, (m, s))| (r - m) / s)
        .collect();

    frame
        .clone()
        .with_column("ret", ret)?
        .with_column("log_ret", log_ret)?
        .with_column(&format!("vol_{}", params.vol_window), vol)?
        .with_column(&format!("zret_{}", params.z_window), zret)
}

fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        out[i] = values[i] / values[i - 1] - 1.0;
    }
    out
}

fn log_diff(values: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        out[i] = values[i].ln() - values[i - 1].ln();
    }
    out
}
