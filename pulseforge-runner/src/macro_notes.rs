//! Human-readable macro context lines for `macro.json`.

use pulseforge_core::data::ResolvedSet;
use pulseforge_core::indicators::last_sma;
use pulseforge_core::IndicatorKey;

/// VIX regime note, then the S&P 500 structure note, then one line per
/// proxied indicator, then the configured footer.
pub fn macro_notes(resolved: &ResolvedSet, footer: &[String]) -> Vec<String> {
    let mut notes = Vec::new();

    if let Some(vix) = resolved
        .get(IndicatorKey::Vix)
        .and_then(|r| r.series.last_value())
    {
        notes.push(vix_note(vix));
    }

    if let Some(note) = resolved
        .get(IndicatorKey::Spy)
        .and_then(|r| spy_note(r.series.values()))
    {
        notes.push(note);
    }

    for result in resolved.iter().filter(|r| r.is_proxy) {
        notes.push(format!(
            "{} approximated from proxy {} ({})",
            result.key, result.provenance.symbol, result.provenance.provider
        ));
    }

    notes.extend(footer.iter().cloned());
    notes
}

pub fn vix_note(vix: f64) -> String {
    if vix > 25.0 {
        format!("VIX elevated at {vix:.1}: market pricing in uncertainty")
    } else if vix < 14.0 {
        format!("VIX at {vix:.1}: extreme complacency, potential for vol expansion")
    } else {
        format!("VIX at {vix:.1}: normal range")
    }
}

/// Needs 50 points for the 50-day average.
pub fn spy_note(values: &[f64]) -> Option<String> {
    let sma50 = last_sma(values, 50)?;
    let last = *values.last()?;
    Some(if last > sma50 {
        format!("S&P 500 trading above 50-day MA (${sma50:.0}): bullish structure intact")
    } else {
        format!("S&P 500 below 50-day MA (${sma50:.0}): cautious positioning warranted")
    })
}
