//! Simple Moving Average (SMA).
//!
//! `sma` is the rolling mean over a window that ends at and includes each
//! index; the first valid value is at index `period - 1` and earlier entries
//! are NaN. `trailing_mean` is the window that ends just before an index,
//! which is what the pulse trend signal compares against.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(window: &[f64]) -> Option<f64> {
    if window.is_empty() {
        None
    } else {
        Some(window.iter().sum::<f64>() / window.len() as f64)
    }
}

/// Rolling SMA aligned with `values`. NaN until the window fills.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        result[i] = window.iter().sum::<f64>() / period as f64;
    }
    result
}

/// Mean of `values[i - period..i]`, excluding `values[i]`.
pub fn trailing_mean(values: &[f64], i: usize, period: usize) -> Option<f64> {
    if period == 0 || i < period || i > values.len() {
        return None;
    }
    mean(&values[i - period..i])
}

/// Mean of the last `period` values, `None` if the slice is shorter.
pub fn last_sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    mean(&values[values.len() - period..])
}
