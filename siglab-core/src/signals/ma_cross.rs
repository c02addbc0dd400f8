//! SMA crossover signal producer.
//!
//! `signal[t] = 1` when the short SMA sits above the long SMA on period t's
//! close (both averages defined), otherwise 0. The tradeable position is the
//! signal delayed one period: a cross confirmed on period t's close is
//! exposed from period t+1 on.

use crate::data::FeatureFrame;
use crate::indicators::sma;

use super::{delay_one, SignalError, SignalGenerator, POSITION_COL, SIGNAL_COL};

/// SMA crossover configuration: short window strictly below long window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmaCrossover {
    short_window: usize,
    long_window: usize,
    price_col: String,
}

impl SmaCrossover {
    /// Validates and builds a crossover producer reading prices from
    /// `close`.
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, SignalError> {
        if short_window == 0 || long_window == 0 {
            return Err(SignalError::ZeroWindow);
        }
        if short_window >= long_window {
            return Err(SignalError::WindowOrder {
                short: short_window,
                long: long_window,
            });
        }
        Ok(Self {
            short_window,
            long_window,
            price_col: "close".to_string(),
        })
    }

    /// Reads prices from a different column.
    pub fn with_price_col(mut self, price_col: &str) -> Self {
        self.price_col = price_col.to_string();
        self
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }
}

impl SignalGenerator for SmaCrossover {
    fn name(&self) -> String {
        format!("sma_cross_{}_{}", self.short_window, self.long_window)
    }

    fn warmup_periods(&self) -> usize {
        // The long SMA needs a full window; the delayed position needs one
        // more period on top.
        self.long_window
    }

    fn generate(&self, frame: &FeatureFrame) -> Result<FeatureFrame, SignalError> {
        let price = frame.column(&self.price_col)?;

        let short = sma(price, self.short_window);
        let long = sma(price, self.long_window);

        let signal: Vec<f64> = short
            .iter()
            .zip(long.iter())
            .map(|(s, l)| {
                if s.is_finite() && l.is_finite() && s > l {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        let position = delay_one(&signal, 0.0);

        let out = frame
            .clone()
            .with_column(&format!("sma_{}", self.short_window), short)?
            .with_column(&format!("sma_{}", self.long_window), long)?
            .with_column(SIGNAL_COL, signal)?
            .with_column(POSITION_COL, position)?;
        Ok(out)
    }
}
