//! Market pulse scoring engine.
//!
//! For each day the engine evaluates up to five sub-signals (trend, momentum,
//! volatility level, volatility direction, volume trend), each clamped to
//! `[0, 100]`, and blends them with a weighted mean renormalized over the
//! signals that are active on that day. Early days simply have fewer signals.
//!
//! When the volatility series is shorter than the benchmark, the volatility
//! level reads the last available value for the remaining days rather than
//! truncating.

pub mod signals;

pub use signals::Signal;

use crate::domain::{PulseSeries, TimeSeries};
use crate::indicators::round_to;

/// Fewest aligned observations the engine will score.
pub const MIN_OBSERVATIONS: usize = 20;

/// Neutral score for a day with no active signal.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Weighted mean of the active signals, rounded to one decimal.
pub fn aggregate(signals: &[Signal]) -> f64 {
    let total_weight: f64 = signals.iter().map(|s| s.weight).sum();
    if signals.is_empty() || total_weight <= 0.0 {
        return NEUTRAL_SCORE;
    }
    let weighted: f64 = signals.iter().map(|s| s.score * s.weight).sum();
    round_to(weighted / total_weight, 1)
}

/// The active signals for day `i`.
pub fn signals_at(values: &[f64], volumes: &[u64], vix: &[f64], i: usize) -> Vec<Signal> {
    let mut active = Vec::with_capacity(5);
    active.extend(signals::trend(values, i));
    active.extend(signals::momentum(values, i));
    if let Some(&level) = vix.get(i.min(vix.len().saturating_sub(1))) {
        active.push(signals::volatility_level(level));
    }
    active.extend(signals::volatility_direction(vix, i));
    active.extend(signals::volume_trend(values, volumes, i));
    active
}

/// Score every aligned day. `None` with fewer than 20 aligned observations.
pub fn score(benchmark: &TimeSeries, volatility: &TimeSeries) -> Option<PulseSeries> {
    let n = benchmark.len().min(volatility.len());
    if n < MIN_OBSERVATIONS {
        return None;
    }

    let values = benchmark.values();
    let volumes = benchmark.volumes();
    let vix = volatility.values();

    let scores: Vec<f64> = (0..n)
        .map(|i| aggregate(&signals_at(values, volumes, vix, i)))
        .collect();

    let offset = benchmark.len() - scores.len();
    Some(PulseSeries {
        dates: benchmark.dates()[offset..].to_vec(),
        scores,
    })
}
