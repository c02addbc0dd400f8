//! Rolling mean and sample standard deviation.
//!
//! Window semantics match a min-periods = window rolling aggregate: the
//! first `window - 1` outputs are NaN, and any window containing a NaN
//! (or other non-finite value) yields NaN rather than a partial statistic.

/// Rolling mean over `window` consecutive values.
///
/// Returns all-NaN output when `window` is 0 or exceeds the input length.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| {
        w.iter().sum::<f64>() / w.len() as f64
    })
}

/// Rolling sample standard deviation (denominator `window - 1`).
///
/// A window of 1 has no dispersion estimate and yields NaN.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    if window < 2 {
        return vec![f64::NAN; values.len()];
    }
    rolling_apply(values, window, |w| {
        let mean = w.iter().sum::<f64>() / w.len() as f64;
        let var = w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (w.len() - 1) as f64;
        var.sqrt()
    })
}

fn rolling_apply(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if window == 0 || window > n {
        return out;
    }
    for i in (window - 1)..n {
        let w = &values[i + 1 - window..=i];
        if w.iter().all(|v| v.is_finite()) {
            out[i] = f(w);
        }
    }
    out
}
