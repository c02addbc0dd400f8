//! Serializable evaluation configuration.
//!
//! `EvalConfig` captures everything needed to reproduce an evaluation run:
//! capital, costs, annualization, the train/test boundary fraction, and the
//! candidate window grid. Defaults mirror the standard hourly setup; a TOML
//! file can override any field.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use siglab_core::backtest::{BacktestParams, CostModel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("train fraction must be inside (0, 1), got {0}")]
    InvalidTrainFraction(f64),

    #[error("periods per year must be positive, got {0}")]
    InvalidPeriodsPerYear(f64),
}

/// One candidate signal configuration: SMA window pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateConfig {
    pub short_window: usize,
    pub long_window: usize,
}

impl CandidateConfig {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }
}

impl std::fmt::Display for CandidateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}/{})", self.short_window, self.long_window)
    }
}

/// Evaluation parameters shared by grid search and walk-forward runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub initial_capital: f64,
    pub fee_rate: f64,
    pub slippage: f64,
    /// Annualization factor (8760 for hourly candles, 365-day year).
    pub periods_per_year: f64,
    /// Share of elapsed calendar time assigned to the training slice.
    pub train_fraction: f64,
    /// Column the simple returns are read from.
    pub return_col: String,
    /// Candidate grid, evaluated in order.
    pub grid: Vec<CandidateConfig>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            fee_rate: 0.001,
            slippage: 0.0002,
            periods_per_year: 8_760.0,
            train_fraction: 0.70,
            return_col: "ret".to_string(),
            grid: vec![
                CandidateConfig::new(10, 50),
                CandidateConfig::new(20, 100),
                CandidateConfig::new(50, 200),
                CandidateConfig::new(30, 150),
                CandidateConfig::new(5, 200),
            ],
        }
    }
}

impl EvalConfig {
    /// Loads and validates a config from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: EvalConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(ConfigError::InvalidTrainFraction(self.train_fraction));
        }
        if !(self.periods_per_year > 0.0) {
            return Err(ConfigError::InvalidPeriodsPerYear(self.periods_per_year));
        }
        Ok(())
    }

    pub fn cost_model(&self) -> CostModel {
        CostModel {
            fee_rate: self.fee_rate,
            slippage: self.slippage,
        }
    }

    /// Engine parameters implied by this config.
    pub fn backtest_params(&self) -> BacktestParams {
        BacktestParams {
            initial_capital: self.initial_capital,
            costs: self.cost_model(),
            return_col: self.return_col.clone(),
            ..Default::default()
        }
    }
}
