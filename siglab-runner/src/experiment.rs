//! Full-sample grid search: evaluate every candidate over one series and
//! rank by Sharpe.
//!
//! This mode has no out-of-sample validation and is susceptible to
//! overfitting by construction. Use it for exploratory ranking only; the
//! walk-forward protocol in [`crate::walk_forward`] is the honest
//! measurement.

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use siglab_core::backtest::{run_backtest, BacktestError};
use siglab_core::data::FeatureFrame;
use siglab_core::metrics::PerformanceMetrics;
use siglab_core::signals::{SignalError, SignalGenerator, SmaCrossover};

use crate::config::{CandidateConfig, EvalConfig};

#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Backtest(#[from] BacktestError),
}

/// One ranked row: a candidate and the metrics it produced.
///
/// Records are frozen once published; ranking never mutates them.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentRecord {
    pub candidate: CandidateConfig,
    pub metrics: PerformanceMetrics,
    pub trade_count: usize,
}

/// Grid search output: records in grid order plus a count of candidates
/// skipped by window validation.
#[derive(Debug)]
pub struct GridSearchResults {
    records: Vec<ExperimentRecord>,
    /// Candidates rejected by window validation (short >= long, zero
    /// window). Deterministic: depends only on the grid.
    pub skipped: usize,
}

impl GridSearchResults {
    /// Records in original grid order.
    pub fn all(&self) -> &[ExperimentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ranked by Sharpe descending. Undefined Sharpe sorts last;
    /// ties keep grid order (stable sort).
    pub fn ranked(&self) -> Vec<&ExperimentRecord> {
        let mut sorted: Vec<&ExperimentRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| compare_sharpe_desc(a.metrics.sharpe, b.metrics.sharpe));
        sorted
    }

    /// The top-ranked record with a defined Sharpe, if any.
    pub fn best(&self) -> Option<&ExperimentRecord> {
        self.ranked()
            .into_iter()
            .find(|r| r.metrics.sharpe.is_some())
    }
}

/// Descending Sharpe order with undefined values last.
fn compare_sharpe_desc(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Runs signal + engine + metrics for one candidate.
pub fn evaluate_candidate(
    frame: &FeatureFrame,
    candidate: CandidateConfig,
    config: &EvalConfig,
) -> Result<ExperimentRecord, EvalError> {
    let producer = SmaCrossover::new(candidate.short_window, candidate.long_window)?;
    let signaled = producer.generate(frame)?;
    let result = run_backtest(&signaled, &config.backtest_params())?;
    let metrics = PerformanceMetrics::compute(&result, config.periods_per_year);
    debug!(
        candidate = %candidate,
        sharpe = ?metrics.sharpe,
        trades = result.trade_count,
        "evaluated candidate"
    );
    Ok(ExperimentRecord {
        candidate,
        metrics,
        trade_count: result.trade_count,
    })
}

/// Evaluates the whole candidate grid over `frame`.
///
/// Candidates are independent: each one reads the shared frame and writes
/// only its own record, so evaluation fans out across threads. Records are
/// collected back in grid order. Candidates failing window validation are
/// skipped (counted in `skipped`); any other failure aborts the search.
pub fn run_grid_search(
    frame: &FeatureFrame,
    config: &EvalConfig,
) -> Result<GridSearchResults, EvalError> {
    let valid: Vec<CandidateConfig> = config
        .grid
        .iter()
        .copied()
        .filter(|c| SmaCrossover::new(c.short_window, c.long_window).is_ok())
        .collect();
    let skipped = config.grid.len() - valid.len();

    let records: Vec<ExperimentRecord> = valid
        .par_iter()
        .map(|&candidate| evaluate_candidate(frame, candidate, config))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GridSearchResults { records, skipped })
}
