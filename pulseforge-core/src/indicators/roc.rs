//! Rate of Change (ROC).
//!
//! Percentage change over N observations.
//! ROC[t] = (v[t] - v[t-period]) / v[t-period] * 100
//! Lookback: period.

/// ROC at a single index. `None` inside the lookback or on a zero base.
pub fn roc_at(values: &[f64], i: usize, period: usize) -> Option<f64> {
    if i < period || i >= values.len() {
        return None;
    }
    let prev = values[i - period];
    if prev == 0.0 {
        return None;
    }
    Some((values[i] - prev) / prev * 100.0)
}

/// ROC aligned with `values`, NaN where undefined.
pub fn roc(values: &[f64], period: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| roc_at(values, i, period).unwrap_or(f64::NAN))
        .collect()
}
