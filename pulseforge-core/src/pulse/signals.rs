//! Per-day sub-signals. Each function looks at one index of the input slices
//! and returns `None` when its lookback or data guard is not met.

use crate::indicators::{mean, roc_at, trailing_mean};

pub const TREND_WEIGHT: f64 = 0.25;
pub const MOMENTUM_WEIGHT: f64 = 0.20;
pub const VOL_LEVEL_WEIGHT: f64 = 0.25;
pub const VOL_DIRECTION_WEIGHT: f64 = 0.15;
pub const VOLUME_WEIGHT: f64 = 0.15;

pub const TREND_PERIOD: usize = 20;
pub const MOMENTUM_PERIOD: usize = 10;
pub const VOL_DIRECTION_PERIOD: usize = 5;
pub const VOLUME_PERIOD: usize = 20;

/// One weighted vote in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub name: &'static str,
    pub score: f64,
    pub weight: f64,
}

impl Signal {
    fn new(name: &'static str, raw: f64, weight: f64) -> Self {
        Self {
            name,
            score: raw.clamp(0.0, 100.0),
            weight,
        }
    }
}

/// Deviation of `values[i]` from the mean of the previous 20 values.
pub fn trend(values: &[f64], i: usize) -> Option<Signal> {
    let sma = trailing_mean(values, i, TREND_PERIOD)?;
    if sma == 0.0 {
        return None;
    }
    let pct = (values[i] - sma) / sma * 100.0;
    Some(Signal::new("trend", 50.0 + pct * 10.0, TREND_WEIGHT))
}

/// 10-period rate of change.
pub fn momentum(values: &[f64], i: usize) -> Option<Signal> {
    let roc = roc_at(values, i, MOMENTUM_PERIOD)?;
    Some(Signal::new("momentum", 50.0 + roc * 8.0, MOMENTUM_WEIGHT))
}

/// Inverse volatility level: 12 and below is fully bullish, 37 and above fully bearish.
pub fn volatility_level(vix: f64) -> Signal {
    Signal::new("volatility", 100.0 - (vix - 12.0) * 4.0, VOL_LEVEL_WEIGHT)
}

/// Falling volatility over the last 5 periods is bullish.
///
/// Only active while `i` is inside the volatility series.
pub fn volatility_direction(vix: &[f64], i: usize) -> Option<Signal> {
    if i < VOL_DIRECTION_PERIOD || i >= vix.len() {
        return None;
    }
    let now = vix[i];
    let prev = vix[(i - VOL_DIRECTION_PERIOD).min(vix.len() - 1)];
    let change = if prev != 0.0 {
        (now - prev) / prev * 100.0
    } else {
        0.0
    };
    Some(Signal::new(
        "vix_direction",
        50.0 - change * 5.0,
        VOL_DIRECTION_WEIGHT,
    ))
}

/// Volume against its trailing 20-period average, signed by the day's price move.
///
/// Needs volume data and a trailing window of strictly positive volumes.
pub fn volume_trend(values: &[f64], volumes: &[u64], i: usize) -> Option<Signal> {
    if i < VOLUME_PERIOD || i >= volumes.len() || i >= values.len() {
        return None;
    }
    let window = &volumes[i - VOLUME_PERIOD..i];
    if window.iter().any(|&v| v == 0) {
        return None;
    }
    let window: Vec<f64> = window.iter().map(|&v| v as f64).collect();
    let avg = mean(&window)?;
    let ratio = volumes[i] as f64 / avg;
    let direction = if values[i] >= values[i - 1] { 1.0 } else { -1.0 };
    Some(Signal::new(
        "breadth",
        50.0 + direction * (ratio - 1.0) * 30.0,
        VOLUME_WEIGHT,
    ))
}
