//! Seeded synthetic candle series for demos and integration tests.
//!
//! Produces a geometric random walk with configurable drift and volatility.
//! Results computed on synthetic data are for plumbing checks only and say
//! nothing about a signal's real-world behavior.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::frame::FeatureFrame;

/// Generates `n` synthetic OHLCV candles spaced `period` apart.
///
/// `drift` and `volatility` are per-period (e.g. 0.0002 / 0.01 for an
/// hourly series). The same seed always yields the same series.
pub fn synthetic_candles(
    n: usize,
    start: DateTime<Utc>,
    period: Duration,
    drift: f64,
    volatility: f64,
    seed: u64,
) -> FeatureFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut index = Vec::with_capacity(n);
    let mut open = Vec::with_capacity(n);
    let mut high = Vec::with_capacity(n);
    let mut low = Vec::with_capacity(n);
    let mut close = Vec::with_capacity(n);
    let mut volume = Vec::with_capacity(n);

    let mut price = 100.0_f64;
    for i in 0..n {
        let shock: f64 = rng.gen_range(-1.0..=1.0);
        let prev = price;
        price *= 1.0 + drift + volatility * shock;
        price = price.max(1e-6);

        let wick: f64 = rng.gen_range(0.0..=volatility) * prev;
        index.push(start + period * i as i32);
        open.push(prev);
        high.push(prev.max(price) + wick);
        low.push((prev.min(price) - wick).max(1e-6));
        close.push(price);
        volume.push(rng.gen_range(100.0..10_000.0));
    }

    let frame = FeatureFrame::new(index);
    // Columns match the generated lengths, so these inserts cannot fail.
    frame
        .with_column("open", open)
        .and_then(|f| f.with_column("high", high))
        .and_then(|f| f.with_column("low", low))
        .and_then(|f| f.with_column("close", close))
        .and_then(|f| f.with_column("volume", volume))
        .expect("generated columns align with the generated index")
}
