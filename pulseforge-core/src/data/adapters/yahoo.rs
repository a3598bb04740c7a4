//! Yahoo Finance chart adapter.
//!
//! Reads daily closes from the v8 chart API. Yahoo has no official API and
//! changes its response format without notice, so every field is optional
//! here and a missing piece becomes `ResponseFormat` rather than a panic.
//! Rows whose close is null (holidays, halted sessions) are skipped.

use super::{encode_symbol, local_date_from_secs, Quote, QuoteSource};
use crate::data::provider::{DataError, FetchWindow, SeriesProvider, Transport};
use crate::domain::{ProviderKind, TimeSeries};
use chrono::NaiveTime;
use serde::Deserialize;

const YAHOO_CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct YahooChart;

impl YahooChart {
    pub fn new() -> Self {
        Self
    }

    fn chart_url(&self, symbol: &str, window: &FetchWindow) -> String {
        let start_ts = window.start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = (window.end + chrono::Duration::days(1))
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp()
            - 1;
        format!(
            "{YAHOO_CHART_URL}/{}?period1={start_ts}&period2={end_ts}&interval=1d",
            encode_symbol(symbol)
        )
    }

    fn recent_url(&self, symbol: &str) -> String {
        format!(
            "{YAHOO_CHART_URL}/{}?range=5d&interval=1d",
            encode_symbol(symbol)
        )
    }
}

/// Map a chart response into a series.
pub(crate) fn parse_chart(symbol: &str, raw: serde_json::Value) -> Result<TimeSeries, DataError> {
    let resp: ChartResponse = serde_json::from_value(raw)
        .map_err(|e| DataError::ResponseFormat(format!("yahoo chart for {symbol}: {e}")))?;

    let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
        Some(err) if err.code == "Not Found" => DataError::NoData {
            symbol: symbol.to_string(),
        },
        Some(err) => DataError::ResponseFormat(format!(
            "{}: {}",
            err.code,
            err.description.unwrap_or_default()
        )),
        None => DataError::ResponseFormat("empty result with no error".into()),
    })?;

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormat("result array is empty".into()))?;

    let timestamps = data.timestamp.ok_or_else(|| DataError::NoData {
        symbol: symbol.to_string(),
    })?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormat("no quote data".into()))?;

    let mut dates = Vec::with_capacity(timestamps.len());
    let mut values = Vec::with_capacity(timestamps.len());
    let mut volumes = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let close = match quote.close.get(i).copied().flatten() {
            Some(c) if c.is_finite() => c,
            _ => continue,
        };
        let date = local_date_from_secs(ts)
            .ok_or_else(|| DataError::ResponseFormat(format!("invalid timestamp: {ts}")))?;

        dates.push(date);
        values.push(close);
        volumes.push(quote.volume.get(i).copied().flatten().unwrap_or(0));
    }

    if values.is_empty() {
        return Err(DataError::NoData {
            symbol: symbol.to_string(),
        });
    }

    TimeSeries::new(dates, values, volumes)
        .map_err(|e| DataError::ResponseFormat(format!("yahoo chart for {symbol}: {e}")))
}

/// Reconstruct a quote from the last two daily closes.
pub(crate) fn quote_from_series(symbol: &str, series: &TimeSeries) -> Result<Quote, DataError> {
    let closes = series.tail_values(2);
    if closes.len() < 2 {
        return Err(DataError::InsufficientHistory {
            needed: 2,
            available: closes.len(),
        });
    }
    let (prev_close, price) = (closes[0], closes[1]);
    if prev_close <= 0.0 {
        return Err(DataError::ResponseFormat(format!(
            "non-positive previous close for {symbol}"
        )));
    }

    Ok(Quote {
        price,
        change: price - prev_close,
        change_pct: (price - prev_close) / prev_close * 100.0,
        prev_close,
        high: None,
        low: None,
        open: None,
        derived: true,
    })
}

impl SeriesProvider for YahooChart {
    fn kind(&self) -> ProviderKind {
        ProviderKind::YahooChart
    }

    fn fetch_series(
        &self,
        transport: &dyn Transport,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<TimeSeries, DataError> {
        let raw = transport.fetch_json(&self.chart_url(symbol, window), &[])?;
        parse_chart(symbol, raw)
    }
}

impl QuoteSource for YahooChart {
    fn name(&self) -> &str {
        "yahoo_chart"
    }

    fn fetch_quote(&self, transport: &dyn Transport, symbol: &str) -> Result<Quote, DataError> {
        let raw = transport.fetch_json(&self.recent_url(symbol), &[])?;
        let series = parse_chart(symbol, raw)?;
        quote_from_series(symbol, &series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn chart(closes: serde_json::Value, volumes: serde_json::Value) -> serde_json::Value {
        json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": "^VIX"},
                    "timestamp": [1_704_196_800i64, 1_704_283_200i64, 1_704_369_600i64],
                    "indicators": {"quote": [{"close": closes, "volume": volumes}]}
                }],
                "error": null
            }
        })
    }

    #[test]
    fn parses_closes_and_volumes() {
        let ts = parse_chart("^VIX", chart(json!([13.1, 13.4, 12.9]), json!([0, 0, 0]))).unwrap();
        assert_eq!(ts.values(), &[13.1, 13.4, 12.9]);
        assert_eq!(ts.volumes(), &[0, 0, 0]);
        assert_eq!(ts.dates().len(), 3);
    }

    #[test]
    fn skips_null_closes() {
        let ts = parse_chart("^VIX", chart(json!([13.1, null, 12.9]), json!([5, null, 7]))).unwrap();
        assert_eq!(ts.values(), &[13.1, 12.9]);
        assert_eq!(ts.volumes(), &[5, 7]);
    }

    #[test]
    fn all_null_is_no_data() {
        let raw = chart(json!([null, null, null]), json!([]));
        assert!(matches!(parse_chart("^VIX", raw), Err(DataError::NoData { .. })));
    }

    #[test]
    fn not_found_error() {
        let raw = json!({"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}});
        assert!(matches!(parse_chart("NOPE", raw), Err(DataError::NoData { .. })));
    }

    #[test]
    fn unexpected_shape_is_format_error() {
        let raw = json!({"finance": {"error": "gone"}});
        assert!(matches!(
            parse_chart("SPY", raw),
            Err(DataError::ResponseFormat(_))
        ));
    }

    #[test]
    fn quote_from_last_two_closes() {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let ts = TimeSeries::from_values(
            vec![base, base + chrono::Duration::days(1)],
            vec![200.0, 205.0],
        )
        .unwrap();
        let q = quote_from_series("XLK", &ts).unwrap();
        assert_eq!(q.price, 205.0);
        assert!((q.change_pct - 2.5).abs() < 1e-12);
        assert!(q.derived);
    }

    #[test]
    fn quote_needs_two_closes() {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let ts = TimeSeries::from_values(vec![base], vec![200.0]).unwrap();
        assert!(matches!(
            quote_from_series("XLK", &ts),
            Err(DataError::InsufficientHistory { needed: 2, available: 1 })
        ));
    }

    #[test]
    fn chart_url_encodes_index_symbol() {
        let y = YahooChart::new();
        let window = FetchWindow {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        let url = y.chart_url("^TNX", &window);
        assert!(url.contains("/%5ETNX?"));
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1704153599"));
    }
}
