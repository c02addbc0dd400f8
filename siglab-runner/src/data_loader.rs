//! CSV loading and writing for candle/feature tables.
//!
//! Layout: a `timestamp` header column (RFC 3339 or epoch seconds) followed
//! by any number of numeric columns. Empty cells load as NaN, the in-frame
//! missing-value sentinel. Malformed rows are errors, not silent skips.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;
use tracing::info;

use siglab_core::data::{validate_features, FeatureFrame, FrameError, SchemaError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("file has no 'timestamp' column")]
    NoTimestampColumn,

    #[error("row {row}: unparseable timestamp '{value}' (expected RFC 3339 or epoch seconds)")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}, column '{column}': unparseable number '{value}'")]
    BadNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Loads a CSV of candles (or any timestamped numeric table) into a frame.
///
/// No schema requirements beyond the timestamp column; use
/// [`load_features_csv`] when the full feature schema is expected.
pub fn load_candles_csv(path: impl AsRef<Path>) -> Result<FeatureFrame, LoadError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let ts_col = headers
        .iter()
        .position(|h| h == "timestamp")
        .ok_or(LoadError::NoTimestampColumn)?;

    let mut index: Vec<DateTime<Utc>> = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        for (col_idx, field) in record.iter().enumerate() {
            let field = field.trim();
            if col_idx == ts_col {
                index.push(parse_timestamp(field).ok_or_else(|| LoadError::BadTimestamp {
                    row: row_idx + 1,
                    value: field.to_string(),
                })?);
            } else {
                let value = if field.is_empty() {
                    f64::NAN
                } else {
                    field.parse().map_err(|_| LoadError::BadNumber {
                        row: row_idx + 1,
                        column: headers[col_idx].clone(),
                        value: field.to_string(),
                    })?
                };
                columns[col_idx].push(value);
            }
        }
    }

    let mut frame = FeatureFrame::new(index);
    for (col_idx, header) in headers.iter().enumerate() {
        if col_idx != ts_col {
            frame.insert_column(header, std::mem::take(&mut columns[col_idx]))?;
        }
    }
    info!(
        path = %path.display(),
        rows = frame.len(),
        cols = frame.column_names().len(),
        "loaded table"
    );
    Ok(frame)
}

/// Loads a feature table and validates the required schema (candles plus
/// derived return and volatility columns).
pub fn load_features_csv(path: impl AsRef<Path>) -> Result<FeatureFrame, LoadError> {
    let frame = load_candles_csv(path)?;
    validate_features(&frame)?;
    Ok(frame)
}

/// Writes a frame to CSV: RFC 3339 timestamps, empty cells for NaN.
pub fn write_frame_csv(frame: &FeatureFrame, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;

    let names = frame.column_names();
    let mut header = vec!["timestamp"];
    header.extend(names.iter().copied());
    writer.write_record(&header)?;

    let columns: Vec<&[f64]> = names
        .iter()
        .map(|n| frame.column(n).expect("column names come from the frame"))
        .collect();
    for (i, ts) in frame.index().iter().enumerate() {
        let mut record = vec![ts.to_rfc3339()];
        for col in &columns {
            record.push(if col[i].is_finite() {
                col[i].to_string()
            } else {
                String::new()
            });
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_timestamp(field: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(field) {
        return Some(ts.with_timezone(&Utc));
    }
    field
        .parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}
