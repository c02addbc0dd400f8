//! Position-to-equity backtest simulation.
//!
//! Long-only, single-asset, binary exposure:
//! - position = 1: exposed to the period's asset return
//! - position = 0: in cash, zero return
//! - each unit of exposure change pays `fee_rate + slippage` once
//!
//! The position column must already be delayed one period relative to the
//! information that produced it; that contract belongs to the signal
//! producer (see [`crate::signals`]).

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::data::{FeatureFrame, FrameError};
use crate::signals::POSITION_COL;

#[derive(Debug, Error)]
pub enum BacktestError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("fee rate must be non-negative, got {0}")]
    NegativeFeeRate(f64),

    #[error("slippage must be non-negative, got {0}")]
    NegativeSlippage(f64),
}

/// Per-side transaction cost model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostModel {
    /// Exchange fee per unit of exposure change.
    pub fee_rate: f64,
    /// Slippage per unit of exposure change.
    pub slippage: f64,
}

impl CostModel {
    pub const ZERO: CostModel = CostModel {
        fee_rate: 0.0,
        slippage: 0.0,
    };

    /// Cost charged once per unit of exposure change.
    pub fn per_side(&self) -> f64 {
        self.fee_rate + self.slippage
    }

    fn validate(&self) -> Result<(), BacktestError> {
        if self.fee_rate < 0.0 {
            return Err(BacktestError::NegativeFeeRate(self.fee_rate));
        }
        if self.slippage < 0.0 {
            return Err(BacktestError::NegativeSlippage(self.slippage));
        }
        Ok(())
    }
}

/// Simulation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestParams {
    pub initial_capital: f64,
    pub costs: CostModel,
    /// Column holding the (already delayed) binary position series.
    pub position_col: String,
    /// Column holding the asset's periodic simple returns.
    pub return_col: String,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            costs: CostModel {
                fee_rate: 0.001,
                slippage: 0.0002,
            },
            position_col: POSITION_COL.to_string(),
            return_col: "ret".to_string(),
        }
    }
}

/// Immutable result of one simulation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestResult {
    pub timestamps: Vec<DateTime<Utc>>,
    /// Capital over time: `initial_capital * prod(1 + net)`. Always finite;
    /// periods with an undefined net return leave it unchanged.
    pub equity: Vec<f64>,
    /// Strategy return after costs. Undefined (NaN) where the asset return
    /// is undefined.
    pub net_returns: Vec<f64>,
    /// Strategy return before costs.
    pub gross_returns: Vec<f64>,
    /// Half-turn trade count: every unit of exposure change counts once, so
    /// a full round trip 0 -> 1 -> 0 counts as 2.
    pub trade_count: usize,
    pub initial_capital: f64,
}

impl BacktestResult {
    /// Final capital, or the initial capital for an empty simulation.
    pub fn final_equity(&self) -> f64 {
        self.equity.last().copied().unwrap_or(self.initial_capital)
    }
}

/// Simulates capital evolution for a position series against asset returns.
///
/// Input rows are defensively sorted by timestamp and de-duplicated (keep
/// last) before simulation, so callers need not pre-sort. Fails before any
/// computation if either named column is absent or a cost is negative.
///
/// Per period t (period 0 has no prior period):
/// 1. `gross[t] = position[t] * ret[t]`
/// 2. `change[t] = |position[t] - position[t-1]|` (0 at t = 0)
/// 3. `cost[t]  = change[t] * (fee_rate + slippage)`
/// 4. `net[t]   = gross[t] - cost[t]`
/// 5. `equity[t] = initial_capital * prod_{i<=t}(1 + net[i])`
pub fn run_backtest(
    frame: &FeatureFrame,
    params: &BacktestParams,
) -> Result<BacktestResult, BacktestError> {
    params.costs.validate()?;
    frame.column(&params.position_col)?;
    frame.column(&params.return_col)?;

    let frame = frame.canonicalize();
    let positions = frame.column(&params.position_col)?;
    let returns = frame.column(&params.return_col)?;

    let n = frame.len();
    let per_side = params.costs.per_side();

    let mut gross_returns = Vec::with_capacity(n);
    let mut net_returns = Vec::with_capacity(n);
    let mut equity = Vec::with_capacity(n);
    let mut turns = 0.0_f64;
    let mut capital = params.initial_capital;

    for t in 0..n {
        let gross = positions[t] * returns[t];
        let change = if t == 0 {
            0.0
        } else {
            (positions[t] - positions[t - 1]).abs()
        };
        let net = gross - change * per_side;

        if change.is_finite() {
            turns += change;
        }
        // An undefined net return contributes a factor of 1: capital parks
        // unchanged through periods with no usable asset return.
        if net.is_finite() {
            capital *= 1.0 + net;
        }

        gross_returns.push(gross);
        net_returns.push(net);
        equity.push(capital);
    }

    Ok(BacktestResult {
        timestamps: frame.index().to_vec(),
        equity,
        net_returns,
        gross_returns,
        trade_count: turns.round() as usize,
        initial_capital: params.initial_capital,
    })
}
