//! Walk-forward evaluation: select on the past, validate on the future.
//!
//! Pipeline stages, strictly in order (no stage observes a later stage's
//! output):
//! 1. Split the series at a time-weighted boundary (default 70% of elapsed
//!    calendar time).
//! 2. Evaluate the whole candidate grid on the training slice.
//! 3. Select the best candidate by train Sharpe (undefined last, stable
//!    ties).
//! 4. Re-evaluate the frozen winner on the test slice only.
//! 5. Compute a fully-invested zero-cost baseline over the same test slice.
//! 6. Assemble the summary. Terminal state: no loop, no retry.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use siglab_core::data::{FeatureFrame, FrameError};
use siglab_core::metrics::{cagr, max_drawdown, sharpe_ratio, PerformanceMetrics};

use crate::config::{CandidateConfig, EvalConfig};
use crate::experiment::{evaluate_candidate, run_grid_search, EvalError, ExperimentRecord};

#[derive(Debug, Error)]
pub enum WalkForwardError {
    #[error("series is empty, nothing to split")]
    EmptySeries,

    #[error("train fraction must be inside (0, 1), got {0}")]
    InvalidTrainFraction(f64),

    #[error("no candidate produced a defined train Sharpe, nothing to select")]
    NoViableCandidate,

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Chronological split of one frame at a time-weighted boundary.
///
/// The boundary timestamp, if present in the index, belongs to both slices.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub boundary: DateTime<Utc>,
    pub train: FeatureFrame,
    pub test: FeatureFrame,
}

/// Terminal summary of one walk-forward run.
#[derive(Debug, Clone, Serialize)]
pub struct WalkForwardSummary {
    pub boundary: DateTime<Utc>,
    pub train_start: DateTime<Utc>,
    pub train_end: DateTime<Utc>,
    pub train_rows: usize,
    pub test_start: DateTime<Utc>,
    pub test_end: DateTime<Utc>,
    pub test_rows: usize,
    /// Candidate chosen on the training slice, frozen for the test slice.
    pub chosen: CandidateConfig,
    /// Training-slice metrics of the chosen candidate.
    pub train_metrics: PerformanceMetrics,
    /// Out-of-sample metrics of the chosen candidate.
    pub test_metrics: PerformanceMetrics,
    pub test_trade_count: usize,
    /// Fully-invested zero-cost baseline over the test slice.
    pub baseline_metrics: PerformanceMetrics,
}

/// Splits `frame` at `start + fraction * (end - start)`.
///
/// The split is time-weighted (calendar time), not row-weighted: for an
/// irregularly sampled series the two differ, and calendar time is the
/// contract here. Rows exactly on the boundary land in both slices.
pub fn split_by_time(
    frame: &FeatureFrame,
    fraction: f64,
) -> Result<TrainTestSplit, WalkForwardError> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(WalkForwardError::InvalidTrainFraction(fraction));
    }
    let frame = frame.canonicalize();
    let (start, end) = match (frame.start(), frame.end()) {
        (Some(s), Some(e)) => (s, e),
        _ => return Err(WalkForwardError::EmptySeries),
    };

    let span = end - start;
    let offset_secs = (span.num_seconds() as f64 * fraction).round() as i64;
    let boundary = start + chrono::Duration::seconds(offset_secs);

    Ok(TrainTestSplit {
        boundary,
        train: frame.between(start, boundary),
        test: frame.between(boundary, end),
    })
}

/// Fully-invested, zero-cost baseline: compound the raw return column from
/// the initial capital, treating undefined returns as zero.
pub fn baseline_buy_and_hold(
    frame: &FeatureFrame,
    config: &EvalConfig,
) -> Result<PerformanceMetrics, WalkForwardError> {
    let returns: Vec<f64> = frame
        .column(&config.return_col)?
        .iter()
        .map(|r| if r.is_finite() { *r } else { 0.0 })
        .collect();

    let mut capital = config.initial_capital;
    let equity: Vec<f64> = returns
        .iter()
        .map(|r| {
            capital *= 1.0 + r;
            capital
        })
        .collect();

    Ok(PerformanceMetrics {
        sharpe: sharpe_ratio(&returns, config.periods_per_year),
        cagr: cagr(&equity, config.periods_per_year),
        max_drawdown: max_drawdown(frame.index(), &equity),
    })
}

/// Runs the full walk-forward protocol over `frame`.
pub fn run_walk_forward(
    frame: &FeatureFrame,
    config: &EvalConfig,
) -> Result<WalkForwardSummary, WalkForwardError> {
    let split = split_by_time(frame, config.train_fraction)?;
    let (train, test) = (&split.train, &split.test);
    info!(
        boundary = %split.boundary,
        train_rows = train.len(),
        test_rows = test.len(),
        "split series for walk-forward"
    );

    // Stage 2 + 3: selection sees the training slice only.
    let train_results = run_grid_search(train, config)?;
    let best: ExperimentRecord = train_results
        .best()
        .cloned()
        .ok_or(WalkForwardError::NoViableCandidate)?;
    info!(
        chosen = %best.candidate,
        train_sharpe = ?best.metrics.sharpe,
        "selected candidate on training slice"
    );

    // Stage 4: the chosen configuration is frozen; only the data changes.
    let test_record = evaluate_candidate(test, best.candidate, config)?;

    // Stage 5: baseline over the same test slice.
    let baseline_metrics = baseline_buy_and_hold(test, config)?;

    let summary = WalkForwardSummary {
        boundary: split.boundary,
        train_start: train.start().expect("train slice is non-empty"),
        train_end: train.end().expect("train slice is non-empty"),
        train_rows: train.len(),
        test_start: test.start().expect("test slice is non-empty"),
        test_end: test.end().expect("test slice is non-empty"),
        test_rows: test.len(),
        chosen: best.candidate,
        train_metrics: best.metrics,
        test_metrics: test_record.metrics,
        test_trade_count: test_record.trade_count,
        baseline_metrics,
    };
    info!(
        test_sharpe = ?summary.test_metrics.sharpe,
        baseline_sharpe = ?summary.baseline_metrics.sharpe,
        "walk-forward complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use siglab_core::data::{add_basic_features, synthetic_candles, FeatureParams};

    fn hourly_features(n: usize, seed: u64) -> FeatureFrame {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let candles = synthetic_candles(n, start, Duration::hours(1), 0.0015, 0.008, seed);
        add_basic_features(&candles, &FeatureParams::default()).unwrap()
    }

    fn small_grid_config() -> EvalConfig {
        EvalConfig {
            grid: vec![
                CandidateConfig::new(5, 20),
                CandidateConfig::new(10, 40),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn split_is_time_weighted_and_inclusive() {
        // Irregular sampling: a time-weighted 50% boundary is NOT the row
        // midpoint.
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let index = vec![
            start,
            start + Duration::hours(1),
            start + Duration::hours(2),
            start + Duration::hours(3),
            start + Duration::hours(100),
        ];
        let frame = FeatureFrame::new(index)
            .with_column("close", vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap();

        let split = split_by_time(&frame, 0.5).unwrap();
        assert_eq!(split.boundary, start + Duration::hours(50));
        assert_eq!(split.train.len(), 4);
        assert_eq!(split.test.len(), 1);
    }

    #[test]
    fn boundary_row_lands_in_both_slices() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let index: Vec<_> = (0..11).map(|i| start + Duration::hours(i)).collect();
        let frame = FeatureFrame::new(index)
            .with_column("close", (0..11).map(|i| i as f64).collect())
            .unwrap();

        // 50% of 10 hours: the boundary falls exactly on the hour-5 row.
        let split = split_by_time(&frame, 0.5).unwrap();
        assert_eq!(split.boundary, start + Duration::hours(5));
        assert_eq!(split.train.end(), Some(split.boundary));
        assert_eq!(split.test.start(), Some(split.boundary));
        assert_eq!(split.train.len() + split.test.len(), 12);
    }

    #[test]
    fn split_rejects_degenerate_inputs() {
        let frame = FeatureFrame::default();
        assert!(matches!(
            split_by_time(&frame, 0.7),
            Err(WalkForwardError::EmptySeries)
        ));

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let frame = FeatureFrame::new(vec![start]);
        assert!(matches!(
            split_by_time(&frame, 1.2),
            Err(WalkForwardError::InvalidTrainFraction(_))
        ));
    }

    #[test]
    fn walk_forward_end_to_end() {
        let frame = hourly_features(3_000, 17);
        let config = small_grid_config();
        let summary = run_walk_forward(&frame, &config).unwrap();

        // Chronology: train precedes test, boundary joins them.
        assert!(summary.train_end <= summary.test_start || summary.train_end == summary.boundary);
        assert!(summary.train_start < summary.boundary);
        assert!(summary.test_end > summary.boundary);
        assert!(config.grid.contains(&summary.chosen));

        // Time-weighted 70% of a uniform hourly series is roughly the 70th
        // percentile row.
        let expected_train = (3_000.0_f64 * 0.7) as usize;
        assert!((summary.train_rows as i64 - expected_train as i64).abs() <= 2);
    }

    #[test]
    fn selection_ignores_the_test_slice() {
        // Scrambling every value strictly after the boundary must not change
        // which candidate wins training, or the training metrics it won
        // with. Leakage here is the bug this protocol exists to prevent.
        let frame = hourly_features(3_000, 23);
        let config = small_grid_config();
        let boundary = split_by_time(&frame, config.train_fraction)
            .unwrap()
            .boundary;

        let mut scrambled = FeatureFrame::new(frame.index().to_vec());
        for name in frame.column_names() {
            let values: Vec<f64> = frame
                .column(name)
                .unwrap()
                .iter()
                .zip(frame.index())
                .map(|(v, ts)| if *ts > boundary { v * 3.0 + 1.0 } else { *v })
                .collect();
            scrambled.insert_column(name, values).unwrap();
        }

        let a = run_walk_forward(&frame, &config).unwrap();
        let b = run_walk_forward(&scrambled, &config).unwrap();
        assert_eq!(a.chosen, b.chosen);
        assert_eq!(a.train_metrics.sharpe, b.train_metrics.sharpe);
        // The out-of-sample side, by contrast, does see the scrambling.
        assert_ne!(a.test_metrics.sharpe, b.test_metrics.sharpe);
    }

    #[test]
    fn baseline_compounds_raw_returns() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let index: Vec<_> = (0..4).map(|i| start + Duration::hours(i)).collect();
        let frame = FeatureFrame::new(index)
            .with_column("ret", vec![f64::NAN, 0.10, -0.05, 0.02])
            .unwrap();

        let config = EvalConfig::default();
        let metrics = baseline_buy_and_hold(&frame, &config).unwrap();

        // Equity: 10_000 -> 10_000 -> 11_000 -> 10_450 -> 10_659
        let dd = metrics.max_drawdown.unwrap();
        assert!((dd.depth - (10_450.0 / 11_000.0 - 1.0)).abs() < 1e-9);
        assert_eq!(dd.peak, start + Duration::hours(1));
        assert_eq!(dd.trough, start + Duration::hours(2));
        assert!(metrics.sharpe.is_some());
        assert!(metrics.cagr.is_some());
    }

    #[test]
    fn no_viable_candidate_is_an_error() {
        // Series far shorter than every long window: all-flat runs, zero
        // variance, no defined Sharpe anywhere.
        let frame = hourly_features(30, 3);
        let config = EvalConfig {
            grid: vec![CandidateConfig::new(50, 200)],
            ..Default::default()
        };
        let err = run_walk_forward(&frame, &config).unwrap_err();
        assert!(matches!(err, WalkForwardError::NoViableCandidate));
    }
}
