//! Output documents and the JSON writer.
//!
//! Each document is a complete replacement of its file: UTF-8 JSON with a
//! two-space indent. Field order in the structs is the order on disk, which
//! keeps reruns over identical inputs byte-identical apart from
//! `last_updated`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use pulseforge_core::{Direction, Prediction};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

pub const METRICS_FILE: &str = "metrics.json";
pub const SECTORS_FILE: &str = "sectors.json";
pub const WATCHLIST_FILE: &str = "watchlist.json";
pub const VOLATILITY_FILE: &str = "volatility.json";
pub const PULSE_FILE: &str = "pulse.json";
pub const PREDICTIONS_FILE: &str = "predictions.json";
pub const MACRO_FILE: &str = "macro.json";

fn is_false(b: &bool) -> bool {
    !*b
}

/// Trailing values of one indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEntry {
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "is_false")]
    pub proxy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsDoc {
    pub last_updated: String,
    #[serde(rename = "SPY", skip_serializing_if = "Option::is_none")]
    pub spy: Option<MetricEntry>,
    #[serde(rename = "VIX", skip_serializing_if = "Option::is_none")]
    pub vix: Option<MetricEntry>,
    #[serde(rename = "DXY", skip_serializing_if = "Option::is_none")]
    pub dxy: Option<MetricEntry>,
    #[serde(rename = "TNX", skip_serializing_if = "Option::is_none")]
    pub tnx: Option<MetricEntry>,
    #[serde(rename = "BTC", skip_serializing_if = "Option::is_none")]
    pub btc: Option<MetricEntry>,
    #[serde(rename = "CL", skip_serializing_if = "Option::is_none")]
    pub cl: Option<MetricEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorQuote {
    pub symbol: String,
    pub price: f64,
    pub change_pct: f64,
}

/// Sector name → quote, serialized as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectorMap(Vec<(String, SectorQuote)>);

impl SectorMap {
    pub fn push(&mut self, name: String, quote: SectorQuote) {
        self.0.push((name, quote));
    }

    pub fn get(&self, name: &str) -> Option<&SectorQuote> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, q)| q)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SectorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, quote) in &self.0 {
            map.serialize_entry(name, quote)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorsDoc {
    pub last_updated: String,
    pub sectors: SectorMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistEntry {
    pub ticker: String,
    pub price: f64,
    pub change_pct: f64,
    pub signal: Direction,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistDoc {
    pub last_updated: String,
    pub stocks: Vec<WatchlistEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedValues {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityDoc {
    pub last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vix_history: Option<DatedValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vix_sma: Option<DatedValues>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PulseDoc {
    pub last_updated: String,
    pub dates: Vec<NaiveDate>,
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionsDoc {
    pub last_updated: String,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroDoc {
    pub last_updated: String,
    pub notes: Vec<String>,
}

/// Serialize `doc` with a two-space indent and replace `dir/name`.
pub fn write_json<T: Serialize>(dir: &Path, name: &str, doc: &T) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut json = serde_json::to_string_pretty(doc)
        .with_context(|| format!("Failed to serialize {name}"))?;
    json.push('\n');
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
