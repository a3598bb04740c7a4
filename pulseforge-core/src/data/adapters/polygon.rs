//! Polygon aggregated-bars adapter.
//!
//! `GET /v2/aggs/ticker/{symbol}/range/1/day/{start}/{end}` returns
//! `{"results": [{"t": <epoch ms>, "c": <close>, "v": <volume>}, ...]}`.
//! The key travels in the `Authorization` header.

use super::{encode_symbol, local_date_from_millis, volume_count, ApiKey};
use crate::data::provider::{DataError, FetchWindow, SeriesProvider, Transport};
use crate::domain::{ProviderKind, TimeSeries};
use serde::Deserialize;

const POLYGON_BASE_URL: &str = "https://api.polygon.io";

#[derive(Debug, Deserialize)]
struct AggsResponse {
    results: Option<Vec<AggBar>>,
}

#[derive(Debug, Deserialize)]
struct AggBar {
    t: i64,
    c: f64,
    #[serde(default)]
    v: Option<f64>,
}

pub struct PolygonAggs {
    api_key: ApiKey,
    base_url: String,
}

impl PolygonAggs {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: POLYGON_BASE_URL.to_string(),
        }
    }

    fn aggs_url(&self, symbol: &str, window: &FetchWindow) -> String {
        format!(
            "{}/v2/aggs/ticker/{}/range/1/day/{}/{}?adjusted=true&sort=asc&limit=5000",
            self.base_url,
            encode_symbol(symbol),
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d"),
        )
    }
}

/// Map an aggregates response into a series.
pub(crate) fn parse_aggs(symbol: &str, raw: serde_json::Value) -> Result<TimeSeries, DataError> {
    let resp: AggsResponse = serde_json::from_value(raw)
        .map_err(|e| DataError::ResponseFormat(format!("polygon aggs for {symbol}: {e}")))?;

    let bars = resp.results.unwrap_or_default();
    if bars.is_empty() {
        return Err(DataError::NoData {
            symbol: symbol.to_string(),
        });
    }

    let mut dates = Vec::with_capacity(bars.len());
    let mut values = Vec::with_capacity(bars.len());
    let mut volumes = Vec::with_capacity(bars.len());

    for bar in &bars {
        let date = local_date_from_millis(bar.t).ok_or_else(|| {
            DataError::ResponseFormat(format!("invalid timestamp {} for {symbol}", bar.t))
        })?;
        dates.push(date);
        values.push(bar.c);
        volumes.push(bar.v.map(volume_count).unwrap_or(0));
    }

    TimeSeries::new(dates, values, volumes)
        .map_err(|e| DataError::ResponseFormat(format!("polygon aggs for {symbol}: {e}")))
}

impl SeriesProvider for PolygonAggs {
    fn kind(&self) -> ProviderKind {
        ProviderKind::PolygonAggs
    }

    fn fetch_series(
        &self,
        transport: &dyn Transport,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<TimeSeries, DataError> {
        let auth = format!("Bearer {}", self.api_key.expose());
        let raw = transport.fetch_json(
            &self.aggs_url(symbol, window),
            &[("Authorization", auth.as_str())],
        )?;
        parse_aggs(symbol, raw)
    }
}
