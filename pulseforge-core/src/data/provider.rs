//! Transport and provider traits, plus the structured error taxonomy.
//!
//! The `Transport` trait is the only place network I/O happens, so adapters,
//! the resolver and the pipeline can all be driven by a fixture transport in
//! tests. `SeriesProvider` abstracts over upstream endpoint shapes (aggregated
//! bars, daily candles, chart API, CSV) so the resolver can treat every source
//! attempt the same way.

use crate::domain::{ProviderKind, TimeSeries};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

/// Structured error types for data acquisition.
///
/// Every variant is degraded into "no data" by the resolver; nothing here is
/// fatal to a pipeline run.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("no data for symbol: {symbol}")]
    NoData { symbol: String },

    #[error("{indicator} value {value} outside plausible range ({min}, {max})")]
    Implausible {
        indicator: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("insufficient history: need {needed} points, have {available}")]
    InsufficientHistory { needed: usize, available: usize },

    #[error("missing credentials for {provider}")]
    MissingCredentials { provider: String },
}

impl DataError {
    /// Whether the transport should try again after a backoff delay.
    ///
    /// Connect/timeout failures, 429 and 5xx are retryable. Parse and
    /// validation failures never are.
    pub fn is_retryable(&self) -> bool {
        match self {
            DataError::Transport { .. } | DataError::RateLimited { .. } => true,
            DataError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Calendar window requested from history endpoints (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// The `days` calendar days ending at `end`.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        Self {
            start: end - chrono::Duration::days(i64::from(days)),
            end,
        }
    }
}

/// Single-request HTTP boundary. Implementations own timeout and retry policy.
pub trait Transport {
    /// GET a URL and parse the body as JSON.
    fn fetch_json(&self, url: &str, headers: &[(&str, &str)])
        -> Result<serde_json::Value, DataError>;

    /// GET a URL and return the raw body.
    fn fetch_text(&self, url: &str) -> Result<String, DataError>;
}

/// A history endpoint that yields a canonical `TimeSeries` for a symbol.
pub trait SeriesProvider {
    fn kind(&self) -> ProviderKind;

    fn fetch_series(
        &self,
        transport: &dyn Transport,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<TimeSeries, DataError>;
}

/// The providers available to the resolver for this run.
///
/// Providers that need credentials are only registered when a key is
/// configured; attempts against an unregistered provider are skipped.
#[derive(Default)]
pub struct ProviderSet {
    providers: BTreeMap<ProviderKind, Box<dyn SeriesProvider>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own kind, replacing any previous one.
    pub fn with(mut self, provider: Box<dyn SeriesProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&dyn SeriesProvider> {
        self.providers.get(&kind).map(|p| p.as_ref())
    }

    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.providers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(DataError::Transport {
            url: "u".into(),
            reason: "timeout".into()
        }
        .is_retryable());
        assert!(DataError::RateLimited { retry_after_secs: 1 }.is_retryable());
        assert!(DataError::HttpStatus {
            url: "u".into(),
            status: 503
        }
        .is_retryable());
        assert!(!DataError::HttpStatus {
            url: "u".into(),
            status: 404
        }
        .is_retryable());
        assert!(!DataError::ResponseFormat("bad".into()).is_retryable());
    }

    #[test]
    fn trailing_window() {
        let end = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let w = FetchWindow::trailing(end, 120);
        assert_eq!(w.start, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(w.end, end);
    }
}
