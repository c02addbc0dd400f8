//! Column-oriented feature frame with a shared time index.
//!
//! A [`FeatureFrame`] is a struct-of-arrays: one `DateTime<Utc>` index plus
//! named `f64` columns of identical length. The equal-length invariant is
//! enforced at every mutation, so downstream code can index columns and the
//! time axis interchangeably. `f64::NAN` is the in-frame missing-value
//! sentinel (leading returns, unfilled rolling windows).

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised by frame construction and column access.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("column '{name}' has {len} values but the index has {index_len}")]
    LengthMismatch {
        name: String,
        len: usize,
        index_len: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<f64>,
}

/// Time-indexed table of named `f64` columns.
///
/// Column insertion order is preserved, which keeps CSV export and test
/// output deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureFrame {
    index: Vec<DateTime<Utc>>,
    columns: Vec<Column>,
}

impl FeatureFrame {
    /// Creates a frame with the given index and no columns.
    pub fn new(index: Vec<DateTime<Utc>>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The shared time index.
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// First timestamp, if any.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.index.first().copied()
    }

    /// Last timestamp, if any.
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.index.last().copied()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Returns a column's values, or `MissingColumn`.
    pub fn column(&self, name: &str) -> Result<&[f64], FrameError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| FrameError::MissingColumn(name.to_string()))
    }

    /// Inserts a column, replacing any existing column of the same name.
    ///
    /// Fails with `LengthMismatch` if the values do not line up with the
    /// index; the frame is left untouched in that case.
    pub fn insert_column(&mut self, name: &str, values: Vec<f64>) -> Result<(), FrameError> {
        if values.len() != self.index.len() {
            return Err(FrameError::LengthMismatch {
                name: name.to_string(),
                len: values.len(),
                index_len: self.index.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => col.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
        Ok(())
    }

    /// Builder-style [`insert_column`](Self::insert_column).
    pub fn with_column(mut self, name: &str, values: Vec<f64>) -> Result<Self, FrameError> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// True when the index is strictly increasing (sorted, no duplicates).
    pub fn is_canonical(&self) -> bool {
        self.index.windows(2).all(|w| w[0] < w[1])
    }

    /// Returns a canonical copy: rows sorted by timestamp ascending, with
    /// duplicate timestamps resolved by keeping the last occurrence.
    ///
    /// Already-canonical frames are cloned as-is.
    pub fn canonicalize(&self) -> FeatureFrame {
        if self.is_canonical() {
            return self.clone();
        }

        // Stable sort by timestamp keeps equal timestamps in original order,
        // so the last row of each run is the last occurrence in the input.
        let mut order: Vec<usize> = (0..self.index.len()).collect();
        order.sort_by_key(|&i| self.index[i]);

        let mut keep: Vec<usize> = Vec::with_capacity(order.len());
        for &row in &order {
            if let Some(&prev) = keep.last() {
                if self.index[prev] == self.index[row] {
                    *keep.last_mut().expect("keep is non-empty") = row;
                    continue;
                }
            }
            keep.push(row);
        }

        self.take_rows(&keep)
    }

    /// Rows with `start <= timestamp <= end`, preserving order.
    ///
    /// Both bounds are inclusive so a boundary timestamp can belong to two
    /// adjacent slices.
    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> FeatureFrame {
        let keep: Vec<usize> = self
            .index
            .iter()
            .enumerate()
            .filter(|(_, ts)| **ts >= start && **ts <= end)
            .map(|(i, _)| i)
            .collect();
        self.take_rows(&keep)
    }

    fn take_rows(&self, rows: &[usize]) -> FeatureFrame {
        FeatureFrame {
            index: rows.iter().map(|&i| self.index[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: rows.iter().map(|&i| c.values[i]).collect(),
                })
                .collect(),
        }
    }
}
