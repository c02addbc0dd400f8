//! Timeframe labels, annualization factors, and index gap detection.
//!
//! Labels follow the `"15m"` / `"1h"` / `"1d"` convention. Annualization
//! uses a 365-day year, so hourly data gets 8760 periods per year.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimeframeError {
    #[error("invalid timeframe label '{0}', expected forms like '15m', '1h', '1d'")]
    InvalidLabel(String),
}

/// Parses a timeframe label into a period duration.
pub fn parse_label(label: &str) -> Result<Duration, TimeframeError> {
    let label = label.trim().to_ascii_lowercase();
    let (count, unit) = label.split_at(label.len().saturating_sub(1));
    let count: i64 = count
        .parse()
        .map_err(|_| TimeframeError::InvalidLabel(label.clone()))?;
    if count <= 0 {
        return Err(TimeframeError::InvalidLabel(label));
    }
    match unit {
        "m" => Ok(Duration::minutes(count)),
        "h" => Ok(Duration::hours(count)),
        "d" => Ok(Duration::days(count)),
        _ => Err(TimeframeError::InvalidLabel(label)),
    }
}

/// Periods per 365-day year for the given period duration.
pub fn periods_per_year(period: Duration) -> f64 {
    Duration::days(365).num_seconds() as f64 / period.num_seconds() as f64
}

/// A hole in a time index: consecutive timestamps further apart than the
/// expected period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gap {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Number of whole periods missing between `start` and `end`.
    pub missing_periods: i64,
}

/// Scans a sorted index for gaps larger than `period`.
pub fn find_gaps(index: &[DateTime<Utc>], period: Duration) -> Vec<Gap> {
    index
        .windows(2)
        .filter_map(|w| {
            let span = w[1] - w[0];
            let missing = span.num_seconds() / period.num_seconds() - 1;
            (missing > 0).then_some(Gap {
                start: w[0],
                end: w[1],
                missing_periods: missing,
            })
        })
        .collect()
}
