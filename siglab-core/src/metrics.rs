//! Performance metrics: pure functions that compute strategy statistics.
//!
//! Every metric is a pure function over a return series or an equity curve.
//! Insufficient data is not an error: each field of the aggregate record is
//! independently optional, and an undefined field never blocks the others.
//! Undefined leading values (NaN) are discarded before statistics are taken.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backtest::BacktestResult;

/// Maximum peak-to-trough decline, with its localization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Drawdown {
    /// Decline as a non-positive fraction (-0.35 = a 35% drawdown).
    pub depth: f64,
    /// Most recent high before the decline.
    pub peak: DateTime<Utc>,
    /// Point of the deepest decline.
    pub trough: DateTime<Utc>,
}

/// Aggregate record for a single backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct PerformanceMetrics {
    /// Annualized Sharpe-style ratio (zero risk-free rate).
    pub sharpe: Option<f64>,
    /// Compound annual growth rate.
    pub cagr: Option<f64>,
    pub max_drawdown: Option<Drawdown>,
}

impl PerformanceMetrics {
    /// Computes all metrics from a backtest result.
    pub fn compute(result: &BacktestResult, periods_per_year: f64) -> Self {
        Self {
            sharpe: sharpe_ratio(&result.net_returns, periods_per_year),
            cagr: cagr(&result.equity, periods_per_year),
            max_drawdown: max_drawdown(&result.timestamps, &result.equity),
        }
    }
}

/// Annualized risk-adjusted ratio: `mean(ret) / std(ret) * sqrt(ppy)`.
///
/// Undefined values are dropped first. None with fewer than 2 usable
/// observations, or when the sample standard deviation (ddof = 1) is zero
/// or undefined.
pub fn sharpe_ratio(returns: &[f64], periods_per_year: f64) -> Option<f64> {
    let usable: Vec<f64> = returns.iter().copied().filter(|r| r.is_finite()).collect();
    if usable.len() < 2 {
        return None;
    }

    let n = usable.len() as f64;
    let mean = usable.iter().sum::<f64>() / n;
    let var = usable.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std = var.sqrt();
    if std == 0.0 || !std.is_finite() {
        return None;
    }
    Some(mean / std * periods_per_year.sqrt())
}

/// Compound annual growth rate over the elapsed periods.
///
/// Elapsed time is counted in periods: `years = (n - 1) / ppy`. None with
/// fewer than 2 usable points, a non-positive first value, or zero elapsed
/// time.
pub fn cagr(equity: &[f64], periods_per_year: f64) -> Option<f64> {
    let usable: Vec<f64> = equity.iter().copied().filter(|e| e.is_finite()).collect();
    if usable.len() < 2 {
        return None;
    }

    let first = usable[0];
    let last = usable[usable.len() - 1];
    if first <= 0.0 {
        return None;
    }

    let years = (usable.len() - 1) as f64 / periods_per_year;
    if years <= 0.0 {
        return None;
    }
    Some((last / first).powf(1.0 / years) - 1.0)
}

/// Maximum drawdown of an equity curve with peak/trough localization.
///
/// Drawdown at each point is `equity / running_max - 1` (always <= 0). The
/// trough is the first point reaching the minimum drawdown; the peak is the
/// first maximum of equity up to and including the trough. A non-decreasing
/// curve degenerates to depth 0 with peak = trough = the first point. None
/// for an empty (or all-undefined) curve.
pub fn max_drawdown(timestamps: &[DateTime<Utc>], equity: &[f64]) -> Option<Drawdown> {
    let usable: Vec<(DateTime<Utc>, f64)> = timestamps
        .iter()
        .zip(equity.iter())
        .filter(|(_, e)| e.is_finite())
        .map(|(ts, e)| (*ts, *e))
        .collect();
    if usable.is_empty() {
        return None;
    }

    let mut running_max = f64::NEG_INFINITY;
    let mut depth = f64::INFINITY;
    let mut trough_idx = 0;
    for (i, (_, e)) in usable.iter().enumerate() {
        running_max = running_max.max(*e);
        let dd = e / running_max - 1.0;
        if dd < depth {
            depth = dd;
            trough_idx = i;
        }
    }

    let mut peak_idx = 0;
    let mut peak_equity = f64::NEG_INFINITY;
    for (i, (_, e)) in usable.iter().enumerate().take(trough_idx + 1) {
        if *e > peak_equity {
            peak_equity = *e;
            peak_idx = i;
        }
    }

    Some(Drawdown {
        depth,
        peak: usable[peak_idx].0,
        trough: usable[trough_idx].0,
    })
}
