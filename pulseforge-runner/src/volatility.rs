//! Volatility history and its 20-day average for `volatility.json`.

use crate::output::{DatedValues, VolatilityDoc};
use pulseforge_core::indicators::{round_to, sma};
use pulseforge_core::TimeSeries;

pub const VIX_SMA_PERIOD: usize = 20;

/// 20-point SMA ending at each index from 19 on, rounded to cents.
pub fn vix_sma(series: &TimeSeries) -> DatedValues {
    let averages = sma(series.values(), VIX_SMA_PERIOD);
    let start = VIX_SMA_PERIOD - 1;
    if series.len() <= start {
        return DatedValues {
            dates: Vec::new(),
            values: Vec::new(),
        };
    }
    DatedValues {
        dates: series.dates()[start..].to_vec(),
        values: averages[start..].iter().map(|v| round_to(*v, 2)).collect(),
    }
}

pub fn volatility_doc(last_updated: &str, vix: Option<&TimeSeries>) -> VolatilityDoc {
    VolatilityDoc {
        last_updated: last_updated.to_string(),
        vix_history: vix.map(|s| DatedValues {
            dates: s.dates().to_vec(),
            values: s.values().to_vec(),
        }),
        vix_sma: vix.map(vix_sma),
    }
}
