//! Signal producers: feature frame in, position column out.
//!
//! A producer appends a `signal` column (1 = exposed, 0 = flat, decided on
//! the current period's close) and a `position` column (the signal delayed
//! one period). The delay is the producer's responsibility: the engine
//! consumes whatever position series it is given and does not re-check for
//! lookahead.

pub mod ma_cross;

pub use ma_cross::SmaCrossover;

use thiserror::Error;

use crate::data::{FeatureFrame, FrameError};

/// Name of the undelayed signal column producers append.
pub const SIGNAL_COL: &str = "signal";

/// Name of the tradeable, one-period-delayed position column.
pub const POSITION_COL: &str = "position";

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("window must be greater than zero")]
    ZeroWindow,

    #[error("short window ({short}) must be strictly below long window ({long})")]
    WindowOrder { short: usize, long: usize },

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Maps a feature frame to a binary position series.
pub trait SignalGenerator {
    /// Human-readable identifier, e.g. `sma_cross_20_100`.
    fn name(&self) -> String;

    /// Periods consumed before the first defined signal can appear.
    fn warmup_periods(&self) -> usize;

    /// Returns a copy of `frame` with [`SIGNAL_COL`] and [`POSITION_COL`]
    /// appended (plus any intermediate indicator columns).
    fn generate(&self, frame: &FeatureFrame) -> Result<FeatureFrame, SignalError>;
}

/// Shifts a series forward by one period, filling the head with `fill`.
pub(crate) fn delay_one(values: &[f64], fill: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if !values.is_empty() {
        out.push(fill);
        out.extend_from_slice(&values[..values.len() - 1]);
    }
    out
}
