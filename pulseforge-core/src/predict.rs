//! Prediction generator: up to three directional calls per run.
//!
//! Order is fixed: trend regime, volatility regime, pulse momentum. Each is
//! emitted only when its input has enough history. Rationale strings embed
//! the computed figures so outputs are reproducible.

use crate::domain::{Direction, Prediction, PulseSeries, TimeSeries};
use crate::indicators::{last_sma, mean};

pub const TREND_MIN_POINTS: usize = 50;
pub const VOLATILITY_MIN_POINTS: usize = 20;
pub const PULSE_WINDOW: usize = 5;

/// Every call whose input is present and long enough.
pub fn predict(
    benchmark: Option<&TimeSeries>,
    volatility: Option<&TimeSeries>,
    pulse: Option<&PulseSeries>,
) -> Vec<Prediction> {
    let mut out = Vec::with_capacity(3);
    out.extend(benchmark.and_then(|s| trend_regime(s.values())));
    out.extend(volatility.and_then(|s| volatility_regime(s.values())));
    out.extend(pulse.and_then(|p| pulse_momentum(&p.scores)));
    out
}

/// `base + round(bonus)`, never above `cap`. The bonus is bounded before the
/// integer cast so extreme ratios cannot overflow.
fn capped(base: i64, bonus: f64, cap: i64) -> u8 {
    let bonus = bonus.round().clamp(0.0, cap as f64) as i64;
    (base + bonus).min(cap).clamp(0, 100) as u8
}

/// Direction and confidence from the latest value and its 20/50 SMAs.
pub fn classify_trend(value: f64, sma20: f64, sma50: f64) -> (Direction, u8) {
    if value > sma20 && sma20 > sma50 {
        (Direction::Bullish, capped(60, (value / sma20 - 1.0) * 500.0, 85))
    } else if value < sma20 && sma20 < sma50 {
        (Direction::Bearish, capped(60, (1.0 - value / sma20) * 500.0, 85))
    } else {
        (Direction::Neutral, 45)
    }
}

pub fn trend_regime(values: &[f64]) -> Option<Prediction> {
    if values.len() < TREND_MIN_POINTS {
        return None;
    }
    let value = *values.last()?;
    let sma20 = last_sma(values, 20)?;
    let sma50 = last_sma(values, 50)?;
    let (direction, confidence) = classify_trend(value, sma20, sma50);

    Some(Prediction {
        name: "Trend Regime".into(),
        direction,
        confidence,
        horizon: "1-2 weeks".into(),
        rationale: format!(
            "SPY vs 20/50 SMA alignment. Price: ${value:.2}, SMA20: ${sma20:.2}, SMA50: ${sma50:.2}"
        ),
    })
}

/// Direction, confidence and note from the latest volatility reading.
pub fn classify_volatility(latest: f64, sma20: f64) -> (Direction, u8, &'static str) {
    let (direction, note) = if latest < 15.0 {
        (
            Direction::Bullish,
            "Low vol regime: complacency can persist but watch for spikes",
        )
    } else if latest > 25.0 {
        (
            Direction::Bearish,
            "Elevated fear: potential capitulation or more downside",
        )
    } else {
        (Direction::Neutral, "Normal volatility range")
    };
    (direction, capped(50, (latest - sma20).abs() * 3.0, 80), note)
}

pub fn volatility_regime(values: &[f64]) -> Option<Prediction> {
    if values.len() < VOLATILITY_MIN_POINTS {
        return None;
    }
    let latest = *values.last()?;
    let sma20 = last_sma(values, 20)?;
    let (direction, confidence, note) = classify_volatility(latest, sma20);

    Some(Prediction {
        name: "Volatility Regime".into(),
        direction,
        confidence,
        horizon: "1 week".into(),
        rationale: format!("VIX: {latest:.1} vs 20-day avg: {sma20:.1}. {note}"),
    })
}

/// Direction, confidence and note from the mean and first-to-last delta of
/// the recent pulse window.
pub fn classify_pulse(avg: f64, delta: f64) -> (Direction, u8, &'static str) {
    let (direction, note) = if avg > 65.0 && delta > 0.0 {
        (Direction::Bullish, "Momentum accelerating into greed zone")
    } else if avg < 35.0 && delta < 0.0 {
        (Direction::Bearish, "Momentum deteriorating into fear zone")
    } else if avg > 60.0 {
        (Direction::Bullish, "Positive pulse but watch for exhaustion")
    } else if avg < 40.0 {
        (Direction::Bearish, "Negative pulse: look for reversal signals")
    } else {
        (Direction::Neutral, "Mixed signals: chop zone")
    };
    (direction, capped(40, (avg - 50.0).abs() * 0.8, 75), note)
}

pub fn pulse_momentum(scores: &[f64]) -> Option<Prediction> {
    if scores.len() < PULSE_WINDOW {
        return None;
    }
    let recent = &scores[scores.len() - PULSE_WINDOW..];
    let avg = mean(recent)?;
    let delta = recent[PULSE_WINDOW - 1] - recent[0];
    let (direction, confidence, note) = classify_pulse(avg, delta);
    let sign = if delta > 0.0 { "+" } else { "" };

    Some(Prediction {
        name: "Pulse Momentum".into(),
        direction,
        confidence,
        horizon: "3-5 days".into(),
        rationale: format!("5-day avg pulse: {avg:.1}, trend: {sign}{delta:.1}. {note}"),
    })
}
