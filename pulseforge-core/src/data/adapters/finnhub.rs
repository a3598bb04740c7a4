//! Finnhub quote provider: latest quotes and daily candles.
//!
//! Quote: `GET /api/v1/quote?symbol=` → `{"c","d","dp","h","l","o","pc"}`,
//! where `c == 0` means the symbol is unknown.
//! Candles: `GET /api/v1/stock/candle?resolution=D` → parallel arrays
//! `c`, `t` (epoch seconds), `v` plus a status `s` that is `"ok"` on success.

use super::{local_date_from_secs, volume_count, ApiKey, Quote, QuoteSource};
use crate::data::provider::{DataError, FetchWindow, SeriesProvider, Transport};
use crate::domain::{ProviderKind, TimeSeries};
use chrono::NaiveTime;
use serde::Deserialize;

const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    c: Option<f64>,
    d: Option<f64>,
    dp: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    o: Option<f64>,
    pc: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CandleResponse {
    s: String,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    t: Vec<i64>,
    #[serde(default)]
    v: Vec<f64>,
}

pub struct Finnhub {
    api_key: ApiKey,
    base_url: String,
}

impl Finnhub {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: FINNHUB_BASE_URL.to_string(),
        }
    }

    fn quote_url(&self, symbol: &str) -> String {
        format!("{}/quote?symbol={symbol}", self.base_url)
    }

    fn candle_url(&self, symbol: &str, window: &FetchWindow) -> String {
        let from = window.start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let to = (window.end + chrono::Duration::days(1))
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp()
            - 1;
        format!(
            "{}/stock/candle?symbol={symbol}&resolution=D&from={from}&to={to}",
            self.base_url
        )
    }

    fn get(&self, transport: &dyn Transport, url: &str) -> Result<serde_json::Value, DataError> {
        transport.fetch_json(url, &[("X-Finnhub-Token", self.api_key.expose())])
    }
}

/// Map a quote response, filling `d`/`dp` from `pc` when the provider omits them.
pub(crate) fn parse_quote(symbol: &str, raw: serde_json::Value) -> Result<Quote, DataError> {
    let resp: QuoteResponse = serde_json::from_value(raw)
        .map_err(|e| DataError::ResponseFormat(format!("finnhub quote for {symbol}: {e}")))?;

    let price = match resp.c {
        Some(c) if c.is_finite() && c != 0.0 => c,
        _ => {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            })
        }
    };
    let prev_close = resp.pc.filter(|pc| pc.is_finite()).unwrap_or(0.0);

    let change = resp.d.unwrap_or(price - prev_close);
    let change_pct = match resp.dp {
        Some(dp) => dp,
        None if prev_close > 0.0 => (price - prev_close) / prev_close * 100.0,
        None => {
            return Err(DataError::ResponseFormat(format!(
                "finnhub quote for {symbol}: no change percent and no previous close"
            )))
        }
    };

    Ok(Quote {
        price,
        change,
        change_pct,
        prev_close,
        high: resp.h,
        low: resp.l,
        open: resp.o,
        derived: false,
    })
}

pub(crate) fn parse_candles(symbol: &str, raw: serde_json::Value) -> Result<TimeSeries, DataError> {
    let resp: CandleResponse = serde_json::from_value(raw)
        .map_err(|e| DataError::ResponseFormat(format!("finnhub candles for {symbol}: {e}")))?;

    if resp.s != "ok" || resp.c.is_empty() {
        return Err(DataError::NoData {
            symbol: symbol.to_string(),
        });
    }
    if resp.t.len() != resp.c.len() {
        return Err(DataError::ResponseFormat(format!(
            "finnhub candles for {symbol}: {} timestamps vs {} closes",
            resp.t.len(),
            resp.c.len()
        )));
    }

    let dates = resp
        .t
        .iter()
        .map(|&ts| {
            local_date_from_secs(ts).ok_or_else(|| {
                DataError::ResponseFormat(format!("invalid timestamp {ts} for {symbol}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let volumes = if resp.v.len() == resp.c.len() {
        resp.v.iter().map(|&v| volume_count(v)).collect()
    } else {
        Vec::new()
    };

    TimeSeries::new(dates, resp.c, volumes)
        .map_err(|e| DataError::ResponseFormat(format!("finnhub candles for {symbol}: {e}")))
}

impl SeriesProvider for Finnhub {
    fn kind(&self) -> ProviderKind {
        ProviderKind::FinnhubCandles
    }

    fn fetch_series(
        &self,
        transport: &dyn Transport,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<TimeSeries, DataError> {
        let raw = self.get(transport, &self.candle_url(symbol, window))?;
        parse_candles(symbol, raw)
    }
}

impl QuoteSource for Finnhub {
    fn name(&self) -> &str {
        "finnhub_quote"
    }

    fn fetch_quote(&self, transport: &dyn Transport, symbol: &str) -> Result<Quote, DataError> {
        let raw = self.get(transport, &self.quote_url(symbol))?;
        parse_quote(symbol, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_quote() {
        let raw = json!({"c": 210.5, "d": 3.2, "dp": 1.544, "h": 212.0, "l": 205.1, "o": 206.0, "pc": 207.3, "t": 1700000000});
        let q = parse_quote("TSLA", raw).unwrap();
        assert_eq!(q.price, 210.5);
        assert_eq!(q.change_pct, 1.544);
        assert_eq!(q.prev_close, 207.3);
        assert_eq!(q.high, Some(212.0));
        assert!(!q.derived);
    }

    #[test]
    fn zero_price_is_no_data() {
        let raw = json!({"c": 0, "d": null, "dp": null, "h": 0, "l": 0, "o": 0, "pc": 0});
        assert!(matches!(parse_quote("NOPE", raw), Err(DataError::NoData { .. })));
    }

    #[test]
    fn null_change_is_derived_from_prev_close() {
        let raw = json!({"c": 110.0, "d": null, "dp": null, "pc": 100.0});
        let q = parse_quote("XLK", raw).unwrap();
        assert!((q.change - 10.0).abs() < 1e-12);
        assert!((q.change_pct - 10.0).abs() < 1e-12);
    }

    #[test]
    fn candles_ok() {
        let raw = json!({
            "s": "ok",
            "c": [470.0, 472.5],
            "t": [1_704_196_800i64, 1_704_283_200i64],
            "v": [1000.0, 1200.0]
        });
        let ts = parse_candles("SPY", raw).unwrap();
        assert_eq!(ts.values(), &[470.0, 472.5]);
        assert_eq!(ts.volumes(), &[1000, 1200]);
    }

    #[test]
    fn candles_no_data_status() {
        let raw = json!({"s": "no_data"});
        assert!(matches!(parse_candles("SPY", raw), Err(DataError::NoData { .. })));
    }

    #[test]
    fn candles_length_mismatch() {
        let raw = json!({"s": "ok", "c": [1.0, 2.0], "t": [1_704_196_800i64]});
        assert!(matches!(
            parse_candles("SPY", raw),
            Err(DataError::ResponseFormat(_))
        ));
    }

    #[test]
    fn token_is_not_in_url() {
        let f = Finnhub::new(ApiKey::new("secret").unwrap());
        assert!(!f.quote_url("XLK").contains("secret"));
    }
}
