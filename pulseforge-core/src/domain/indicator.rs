//! Logical indicators and the provenance of a resolved series.

use super::series::TimeSeries;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The macro indicators the pipeline resolves.
///
/// Variant order is the output order in `metrics.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKey {
    /// Benchmark equity index.
    Spy,
    /// Volatility index.
    Vix,
    /// US dollar index.
    Dxy,
    /// 10-year treasury yield, in percent.
    Tnx,
    /// Crypto index.
    Btc,
    /// Crude oil, USD per barrel.
    Cl,
}

impl IndicatorKey {
    pub const ALL: [IndicatorKey; 6] = [
        IndicatorKey::Spy,
        IndicatorKey::Vix,
        IndicatorKey::Dxy,
        IndicatorKey::Tnx,
        IndicatorKey::Btc,
        IndicatorKey::Cl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKey::Spy => "SPY",
            IndicatorKey::Vix => "VIX",
            IndicatorKey::Dxy => "DXY",
            IndicatorKey::Tnx => "TNX",
            IndicatorKey::Btc => "BTC",
            IndicatorKey::Cl => "CL",
        }
    }
}

impl fmt::Display for IndicatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream data providers, one per endpoint shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Aggregated daily bars (Polygon).
    PolygonAggs,
    /// Quote provider daily candles (Finnhub).
    FinnhubCandles,
    /// Generic chart endpoint (Yahoo Finance v8).
    YahooChart,
    /// Economic data CSV (FRED).
    FredCsv,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::PolygonAggs => "polygon_aggs",
            ProviderKind::FinnhubCandles => "finnhub_candles",
            ProviderKind::YahooChart => "yahoo_chart",
            ProviderKind::FredCsv => "fred_csv",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which source attempt produced a series. Used for logging only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub provider: ProviderKind,
    pub symbol: String,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.symbol)
    }
}

/// A validated series for one logical indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorResult {
    pub key: IndicatorKey,
    pub series: TimeSeries,
    /// True when a substitute instrument (scaled ETF) stood in for the
    /// canonical one.
    pub is_proxy: bool,
    pub provenance: Provenance,
}
