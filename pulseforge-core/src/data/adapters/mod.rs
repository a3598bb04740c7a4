//! Provider adapters: raw upstream responses in, canonical `TimeSeries` out.
//!
//! Adapters only map shapes (timestamp → local calendar date, field
//! extraction). Any malformed input becomes `DataError::ResponseFormat` or
//! `DataError::NoData`; adapters never panic on upstream data. Duplicate
//! dates are passed through as delivered.

mod finnhub;
mod fred;
mod polygon;
mod yahoo;

pub use finnhub::Finnhub;
pub use fred::FredCsv;
pub use polygon::PolygonAggs;
pub use yahoo::YahooChart;

use super::provider::{DataError, Transport};
use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;
use std::fmt;

/// A provider credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// `None` for blank keys, so an empty env var counts as "not configured".
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Latest-session quote snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
    pub prev_close: f64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub open: Option<f64>,
    /// True when the quote was reconstructed from daily closes rather than
    /// read from a quote endpoint.
    #[serde(skip)]
    pub derived: bool,
}

/// A source of latest-session quotes.
pub trait QuoteSource {
    fn name(&self) -> &str;

    fn fetch_quote(&self, transport: &dyn Transport, symbol: &str) -> Result<Quote, DataError>;
}

/// Epoch milliseconds → calendar date in local time.
pub(crate) fn local_date_from_millis(ms: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.date_naive())
}

/// Epoch seconds → calendar date in local time.
pub(crate) fn local_date_from_secs(secs: i64) -> Option<NaiveDate> {
    Local.timestamp_opt(secs, 0).single().map(|dt| dt.date_naive())
}

/// Provider volumes arrive as floats on some endpoints; clamp to a count.
pub(crate) fn volume_count(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v.round() as u64
    } else {
        0
    }
}

/// Percent-encode the characters index symbols use that are unsafe in a path.
pub(crate) fn encode_symbol(symbol: &str) -> String {
    symbol.replace('^', "%5E").replace(' ', "%20")
}
