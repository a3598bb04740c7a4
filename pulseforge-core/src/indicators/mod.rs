//! Rolling-window helpers over plain value slices.
//!
//! The pulse engine, the prediction generator and the volatility document all
//! need the same two primitives (simple moving average and rate of change),
//! sometimes over a window that ends just before an index and sometimes over
//! one that includes it. Everything here is pure and works on `&[f64]`.

pub mod roc;
pub mod sma;

pub use roc::{roc, roc_at};
pub use sma::{last_sma, mean, sma, trailing_mean};

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
