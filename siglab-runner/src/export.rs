//! CSV artifact export: experiment tables and walk-forward summaries.

use anyhow::Result;
use std::path::Path;

use siglab_core::metrics::PerformanceMetrics;

use crate::experiment::GridSearchResults;
use crate::walk_forward::WalkForwardSummary;

fn opt_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn metric_fields(metrics: &PerformanceMetrics) -> [String; 3] {
    [
        opt_field(metrics.sharpe),
        opt_field(metrics.cagr),
        opt_field(metrics.max_drawdown.map(|d| d.depth)),
    ]
}

/// Writes the ranked experiment table. Undefined metrics become empty
/// fields.
pub fn export_experiments(results: &GridSearchResults, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(["short", "long", "sharpe", "cagr", "mdd", "trades"])?;
    for record in results.ranked() {
        let [sharpe, cagr, mdd] = metric_fields(&record.metrics);
        writer.write_record([
            record.candidate.short_window.to_string(),
            record.candidate.long_window.to_string(),
            sharpe,
            cagr,
            mdd,
            record.trade_count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a one-row walk-forward summary.
pub fn export_walk_forward(summary: &WalkForwardSummary, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record([
        "split_date",
        "best_short_train",
        "best_long_train",
        "train_sharpe_best",
        "test_sharpe_best",
        "test_cagr_best",
        "test_mdd_best",
        "test_trades",
        "test_bh_sharpe",
        "test_bh_cagr",
        "test_bh_mdd",
    ])?;

    let [train_sharpe, _, _] = metric_fields(&summary.train_metrics);
    let [test_sharpe, test_cagr, test_mdd] = metric_fields(&summary.test_metrics);
    let [bh_sharpe, bh_cagr, bh_mdd] = metric_fields(&summary.baseline_metrics);
    writer.write_record([
        summary.boundary.to_rfc3339(),
        summary.chosen.short_window.to_string(),
        summary.chosen.long_window.to_string(),
        train_sharpe,
        test_sharpe,
        test_cagr,
        test_mdd,
        summary.test_trade_count.to_string(),
        bh_sharpe,
        bh_cagr,
        bh_mdd,
    ])?;
    writer.flush()?;
    Ok(())
}
