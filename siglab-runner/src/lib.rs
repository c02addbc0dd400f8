//! SigLab Runner: evaluation orchestration on top of `siglab-core`.
//!
//! This crate builds on the core engine to provide:
//! - `EvalConfig`: TOML-loadable evaluation parameters and candidate grid
//! - Full-sample grid search with Sharpe ranking (exploratory mode)
//! - Walk-forward evaluation: chronological train/test split, train-side
//!   selection, frozen out-of-sample validation, buy-and-hold baseline
//! - CSV loading of candle/feature tables
//! - Text reports and CSV artifact export

pub mod config;
pub mod data_loader;
pub mod experiment;
pub mod export;
pub mod report;
pub mod walk_forward;

pub use config::{CandidateConfig, ConfigError, EvalConfig};
pub use data_loader::{load_candles_csv, load_features_csv, write_frame_csv, LoadError};
pub use experiment::{run_grid_search, EvalError, ExperimentRecord, GridSearchResults};
pub use export::{export_experiments, export_walk_forward};
pub use report::{render_grid_table, render_walk_forward};
pub use walk_forward::{
    run_walk_forward, split_by_time, TrainTestSplit, WalkForwardError, WalkForwardSummary,
};
