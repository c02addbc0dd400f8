//! Property tests for engine and metrics invariants.
//!
//! Uses proptest to verify:
//! 1. Sort invariance: shuffling/duplicating input rows never changes the result
//! 2. Cost neutrality: zero costs make net returns identical to gross returns
//! 3. Equity is always finite and positive for bounded returns
//! 4. Trade counting: half-turns equal the number of exposure flips
//! 5. Drawdown is non-positive and peak never follows trough

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use siglab_core::backtest::{run_backtest, BacktestParams, CostModel};
use siglab_core::data::FeatureFrame;
use siglab_core::metrics::max_drawdown;
use siglab_core::signals::POSITION_COL;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn build_frame(positions: &[f64], returns: &[f64]) -> FeatureFrame {
    let index = (0..positions.len())
        .map(|i| start() + Duration::hours(i as i64))
        .collect();
    FeatureFrame::new(index)
        .with_column(POSITION_COL, positions.to_vec())
        .unwrap()
        .with_column("ret", returns.to_vec())
        .unwrap()
}

fn arb_positions() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(prop::bool::ANY.prop_map(|b| if b { 1.0 } else { 0.0 }), 1..80)
}

/// (position, return) rows with returns bounded away from -100%.
fn arb_rows() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec(
        (
            prop::bool::ANY.prop_map(|b| if b { 1.0 } else { 0.0 }),
            -0.2..0.2_f64,
        ),
        1..80,
    )
}

proptest! {
    /// Permuting input rows yields the identical result as the sorted run.
    #[test]
    fn sort_invariance(
        positions in arb_positions(),
        seed in 0..1000_usize,
    ) {
        let n = positions.len();
        let returns: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin() * 0.05).collect();
        let frame = build_frame(&positions, &returns);

        // Deterministic shuffle of row order.
        let mut rows: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            rows.swap(i, (seed * 31 + i * 7) % (i + 1));
        }
        let index: Vec<DateTime<Utc>> =
            rows.iter().map(|&i| start() + Duration::hours(i as i64)).collect();
        let shuffled = FeatureFrame::new(index)
            .with_column(POSITION_COL, rows.iter().map(|&i| positions[i]).collect())
            .unwrap()
            .with_column("ret", rows.iter().map(|&i| returns[i]).collect())
            .unwrap();

        let params = BacktestParams::default();
        let a = run_backtest(&frame, &params).unwrap();
        let b = run_backtest(&shuffled, &params).unwrap();
        prop_assert_eq!(a, b);
    }

    /// With zero fee and slippage, net returns equal gross returns exactly.
    #[test]
    fn cost_neutrality(positions in arb_positions()) {
        let n = positions.len();
        let frame_returns: Vec<f64> = (0..n).map(|i| (i as f64 * 0.61).cos() * 0.08).collect();
        let frame = build_frame(&positions, &frame_returns);

        let params = BacktestParams {
            costs: CostModel::ZERO,
            ..Default::default()
        };
        let result = run_backtest(&frame, &params).unwrap();
        prop_assert_eq!(result.net_returns, result.gross_returns);
    }

    /// Bounded returns keep equity finite and strictly positive.
    #[test]
    fn equity_stays_positive(rows in arb_rows()) {
        let (positions, returns): (Vec<f64>, Vec<f64>) = rows.into_iter().unzip();
        let frame = build_frame(&positions, &returns);

        let result = run_backtest(&frame, &BacktestParams::default()).unwrap();
        prop_assert!(result.equity.iter().all(|e| e.is_finite() && *e > 0.0));
    }

    /// Trade count equals the number of adjacent position flips.
    #[test]
    fn trade_count_equals_flips(positions in arb_positions()) {
        let n = positions.len();
        let returns = vec![0.01; n];
        let frame = build_frame(&positions, &returns);

        let flips = positions.windows(2).filter(|w| w[0] != w[1]).count();
        let result = run_backtest(&frame, &BacktestParams::default()).unwrap();
        prop_assert_eq!(result.trade_count, flips);
    }

    /// Drawdown depth is never positive, and the peak never follows the trough.
    #[test]
    fn drawdown_is_non_positive(equity in prop::collection::vec(1.0..1000.0_f64, 1..60)) {
        let index: Vec<DateTime<Utc>> = (0..equity.len())
            .map(|i| start() + Duration::hours(i as i64))
            .collect();
        let dd = max_drawdown(&index, &equity).unwrap();
        prop_assert!(dd.depth <= 0.0);
        prop_assert!(dd.peak <= dd.trough);
    }
}
