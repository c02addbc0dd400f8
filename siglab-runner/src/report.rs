//! Plain-text report rendering for grid and walk-forward results.
//!
//! Pure consumers of the result records; nothing here feeds back into
//! evaluation.

use siglab_core::metrics::PerformanceMetrics;

use crate::experiment::GridSearchResults;
use crate::walk_forward::WalkForwardSummary;

fn fmt_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "n/a".to_string(),
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

fn metrics_line(metrics: &PerformanceMetrics) -> String {
    let mdd = metrics.max_drawdown.map(|d| d.depth);
    format!(
        "Sharpe={}  CAGR={}  MDD={}",
        fmt_ratio(metrics.sharpe),
        fmt_pct(metrics.cagr),
        fmt_pct(mdd),
    )
}

/// Renders the ranked experiment table.
pub fn render_grid_table(results: &GridSearchResults) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{:<14} {:>8} {:>9} {:>9} {:>7}",
        "config", "sharpe", "cagr", "mdd", "trades"
    ));
    for record in results.ranked() {
        let mdd = record.metrics.max_drawdown.map(|d| d.depth);
        lines.push(format!(
            "{:<14} {:>8} {:>9} {:>9} {:>7}",
            record.candidate.to_string(),
            fmt_ratio(record.metrics.sharpe),
            fmt_pct(record.metrics.cagr),
            fmt_pct(mdd),
            record.trade_count,
        ));
    }
    if results.skipped > 0 {
        lines.push(format!(
            "({} candidate(s) skipped by window validation)",
            results.skipped
        ));
    }
    lines.join("\n")
}

/// Renders the walk-forward summary in the reference report layout.
pub fn render_walk_forward(summary: &WalkForwardSummary) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Train: {} -> {} (n={})",
        summary.train_start, summary.train_end, summary.train_rows
    ));
    lines.push(format!(
        "Test:  {} -> {} (n={})",
        summary.test_start, summary.test_end, summary.test_rows
    ));
    lines.push(format!("Split boundary: {}", summary.boundary));
    lines.push(String::new());

    lines.push(format!(
        "Chosen on train: {} ({})",
        summary.chosen,
        metrics_line(&summary.train_metrics)
    ));
    lines.push(String::new());

    lines.push("=== Out-of-sample (test) ===".to_string());
    lines.push(format!(
        "{}  {}  trades={}",
        summary.chosen,
        metrics_line(&summary.test_metrics),
        summary.test_trade_count
    ));
    lines.push(String::new());

    lines.push("=== Buy & hold on test ===".to_string());
    lines.push(metrics_line(&summary.baseline_metrics));
    lines.join("\n")
}
