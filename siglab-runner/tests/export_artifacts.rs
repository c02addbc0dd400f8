//! Artifact export round-trips through real files.

use chrono::{Duration, TimeZone, Utc};
use siglab_core::data::{add_basic_features, synthetic_candles, FeatureParams};
use siglab_runner::{
    export_experiments, export_walk_forward, run_grid_search, walk_forward::run_walk_forward,
    CandidateConfig, EvalConfig,
};

fn feature_frame() -> siglab_core::data::FeatureFrame {
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let candles = synthetic_candles(2_500, start, Duration::hours(1), 0.0015, 0.008, 33);
    add_basic_features(&candles, &FeatureParams::default()).unwrap()
}

fn small_config() -> EvalConfig {
    EvalConfig {
        grid: vec![CandidateConfig::new(5, 20), CandidateConfig::new(10, 40)],
        ..Default::default()
    }
}

#[test]
fn experiment_table_exports_ranked_rows() {
    let results = run_grid_search(&feature_frame(), &small_config()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("experiments.csv");
    export_experiments(&results, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next().unwrap(), "short,long,sharpe,cagr,mdd,trades");
    assert_eq!(lines.count(), results.len());
    assert!(text.contains("5,20,"));
    assert!(text.contains("10,40,"));
}

#[test]
fn walk_forward_summary_exports_one_row() {
    let summary = run_walk_forward(&feature_frame(), &small_config()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("walkforward_summary.csv");
    export_walk_forward(&summary, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("split_date,best_short_train,best_long_train"));
    assert!(lines[1].contains(&summary.chosen.short_window.to_string()));
    assert!(lines[1].contains(&summary.boundary.to_rfc3339()));
}
