//! Required-column validation for feature tables.
//!
//! Any core operation that consumes a feature table assumes candles plus
//! derived returns are present. Validation happens at the ingestion edge so
//! the engine and evaluator can rely on it.

use thiserror::Error;

use super::frame::FeatureFrame;

/// Columns every feature table must carry.
pub const REQUIRED_COLUMNS: [&str; 7] =
    ["open", "high", "low", "close", "volume", "ret", "log_ret"];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("feature table is missing required column: {0}")]
    MissingColumn(String),

    #[error("feature table has no volatility column (expected something like vol_24)")]
    MissingVolatility,
}

/// Validates that `frame` carries the full feature schema: all of
/// [`REQUIRED_COLUMNS`] plus at least one `vol_*` column.
pub fn validate_features(frame: &FeatureFrame) -> Result<(), SchemaError> {
    for name in REQUIRED_COLUMNS {
        if !frame.has_column(name) {
            return Err(SchemaError::MissingColumn(name.to_string()));
        }
    }
    if !frame.column_names().iter().any(|n| n.starts_with("vol_")) {
        return Err(SchemaError::MissingVolatility);
    }
    Ok(())
}
