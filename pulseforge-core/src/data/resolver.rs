//! Indicator resolver: ordered fallback sources with unit transforms and a
//! plausibility check on the latest value.
//!
//! Each indicator is described by an `IndicatorSpec`, a declarative list of
//! `SourceAttempt`s. The resolver walks the list and keeps the first series
//! that fetches, parses and validates. Failures are logged and fall through;
//! they are never retried here (the transport owns retries). If no attempt
//! succeeds the indicator is simply absent from the `ResolvedSet`.

use super::provider::{DataError, FetchWindow, ProviderSet, Transport};
use crate::domain::{IndicatorKey, IndicatorResult, Provenance, ProviderKind};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Linear conversion from the source's units into the indicator's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitTransform {
    Identity,
    /// Multiply every value by a constant.
    Scale(f64),
    /// Divide every value by a constant.
    Divide(f64),
}

impl UnitTransform {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            UnitTransform::Identity => value,
            UnitTransform::Scale(k) => value * k,
            UnitTransform::Divide(k) => value / k,
        }
    }
}

/// Open interval a sane latest value must fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibleRange {
    pub min: f64,
    pub max: f64,
}

impl PlausibleRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value > self.min && value < self.max
    }
}

/// One entry in an indicator's fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceAttempt {
    pub provider: ProviderKind,
    pub symbol: String,
    pub transform: UnitTransform,
    pub is_proxy: bool,
}

impl SourceAttempt {
    pub fn new(provider: ProviderKind, symbol: impl Into<String>) -> Self {
        Self {
            provider,
            symbol: symbol.into(),
            transform: UnitTransform::Identity,
            is_proxy: false,
        }
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        self.transform = UnitTransform::Scale(factor);
        self
    }

    pub fn divided(mut self, divisor: f64) -> Self {
        self.transform = UnitTransform::Divide(divisor);
        self
    }

    /// Mark as a substitute instrument.
    pub fn proxy(mut self) -> Self {
        self.is_proxy = true;
        self
    }
}

/// Declarative resolution policy for one indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSpec {
    pub key: IndicatorKey,
    pub range: Option<PlausibleRange>,
    pub sources: Vec<SourceAttempt>,
}

impl IndicatorSpec {
    pub fn new(key: IndicatorKey) -> Self {
        Self {
            key,
            range: None,
            sources: Vec::new(),
        }
    }

    pub fn within(mut self, min: f64, max: f64) -> Self {
        self.range = Some(PlausibleRange::new(min, max));
        self
    }

    pub fn source(mut self, attempt: SourceAttempt) -> Self {
        self.sources.push(attempt);
        self
    }
}

/// Indicators that resolved this run, keyed in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSet {
    results: BTreeMap<IndicatorKey, IndicatorResult>,
}

impl ResolvedSet {
    pub fn insert(&mut self, result: IndicatorResult) {
        self.results.insert(result.key, result);
    }

    pub fn get(&self, key: IndicatorKey) -> Option<&IndicatorResult> {
        self.results.get(&key)
    }

    pub fn contains(&self, key: IndicatorKey) -> bool {
        self.results.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorResult> {
        self.results.values()
    }

    pub fn keys(&self) -> Vec<IndicatorKey> {
        self.results.keys().copied().collect()
    }

    /// Keys from `IndicatorKey::ALL` that did not resolve.
    pub fn missing(&self) -> Vec<IndicatorKey> {
        IndicatorKey::ALL
            .into_iter()
            .filter(|k| !self.results.contains_key(k))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

pub struct Resolver<'a> {
    transport: &'a dyn Transport,
    providers: &'a ProviderSet,
    window: FetchWindow,
}

impl<'a> Resolver<'a> {
    pub fn new(transport: &'a dyn Transport, providers: &'a ProviderSet, window: FetchWindow) -> Self {
        Self {
            transport,
            providers,
            window,
        }
    }

    /// First attempt in `spec.sources` that yields a plausible series.
    pub fn resolve(&self, spec: &IndicatorSpec) -> Option<IndicatorResult> {
        for attempt in &spec.sources {
            match self.try_attempt(spec, attempt) {
                Ok(result) => {
                    info!(
                        indicator = %spec.key,
                        provider = %attempt.provider,
                        symbol = %attempt.symbol,
                        points = result.series.len(),
                        proxy = result.is_proxy,
                        "indicator resolved"
                    );
                    return Some(result);
                }
                Err(DataError::MissingCredentials { provider }) => {
                    debug!(
                        indicator = %spec.key,
                        provider = %provider,
                        symbol = %attempt.symbol,
                        "provider not configured, skipping"
                    );
                }
                Err(e) => {
                    warn!(
                        indicator = %spec.key,
                        provider = %attempt.provider,
                        symbol = %attempt.symbol,
                        error = %e,
                        "source attempt failed, falling through"
                    );
                }
            }
        }

        warn!(indicator = %spec.key, "all sources failed, indicator omitted");
        None
    }

    pub fn resolve_all(&self, specs: &[IndicatorSpec]) -> ResolvedSet {
        let mut set = ResolvedSet::default();
        for spec in specs {
            if let Some(result) = self.resolve(spec) {
                set.insert(result);
            }
        }
        set
    }

    fn try_attempt(
        &self,
        spec: &IndicatorSpec,
        attempt: &SourceAttempt,
    ) -> Result<IndicatorResult, DataError> {
        let provider =
            self.providers
                .get(attempt.provider)
                .ok_or_else(|| DataError::MissingCredentials {
                    provider: attempt.provider.to_string(),
                })?;

        let raw = provider.fetch_series(self.transport, &attempt.symbol, &self.window)?;
        let series = match attempt.transform {
            UnitTransform::Identity => raw,
            t => raw.map_values(|v| t.apply(v)),
        };

        let last = series.last_value().ok_or_else(|| DataError::NoData {
            symbol: attempt.symbol.clone(),
        })?;
        if let Some(range) = spec.range {
            if !range.contains(last) {
                return Err(DataError::Implausible {
                    indicator: spec.key.to_string(),
                    value: last,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        Ok(IndicatorResult {
            key: spec.key,
            series,
            is_proxy: attempt.is_proxy,
            provenance: Provenance {
                provider: attempt.provider,
                symbol: attempt.symbol.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::SeriesProvider;
    use crate::domain::TimeSeries;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    struct NoTransport;

    impl Transport for NoTransport {
        fn fetch_json(
            &self,
            url: &str,
            _headers: &[(&str, &str)],
        ) -> Result<serde_json::Value, DataError> {
            Err(DataError::Transport {
                url: url.to_string(),
                reason: "offline".into(),
            })
        }

        fn fetch_text(&self, url: &str) -> Result<String, DataError> {
            Err(DataError::Transport {
                url: url.to_string(),
                reason: "offline".into(),
            })
        }
    }

    /// Serves a flat two-point series per known symbol.
    struct FakeProvider {
        kind: ProviderKind,
        by_symbol: HashMap<&'static str, f64>,
    }

    impl FakeProvider {
        fn new(kind: ProviderKind, by_symbol: &[(&'static str, f64)]) -> Self {
            Self {
                kind,
                by_symbol: by_symbol.iter().copied().collect(),
            }
        }
    }

    impl SeriesProvider for FakeProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn fetch_series(
            &self,
            _transport: &dyn Transport,
            symbol: &str,
            _window: &FetchWindow,
        ) -> Result<TimeSeries, DataError> {
            let last = *self.by_symbol.get(symbol).ok_or_else(|| DataError::NoData {
                symbol: symbol.to_string(),
            })?;
            let base = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
            TimeSeries::from_values(
                vec![base, base + chrono::Duration::days(1)],
                vec![last, last],
            )
            .map_err(|e| DataError::ResponseFormat(e.to_string()))
        }
    }

    fn window() -> FetchWindow {
        FetchWindow::trailing(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(), 30)
    }

    #[test]
    fn implausible_primary_falls_through() {
        let providers = ProviderSet::new()
            .with(Box::new(FakeProvider::new(ProviderKind::YahooChart, &[("^VIX", 250.0)])))
            .with(Box::new(FakeProvider::new(ProviderKind::PolygonAggs, &[("I:VIX", 17.5)])));
        let spec = IndicatorSpec::new(IndicatorKey::Vix)
            .within(5.0, 100.0)
            .source(SourceAttempt::new(ProviderKind::YahooChart, "^VIX"))
            .source(SourceAttempt::new(ProviderKind::PolygonAggs, "I:VIX"));

        let resolver = Resolver::new(&NoTransport, &providers, window());
        let result = resolver.resolve(&spec).unwrap();
        assert_eq!(result.series.last_value(), Some(17.5));
        assert_eq!(result.provenance.provider, ProviderKind::PolygonAggs);
        assert!(!result.is_proxy);
    }

    #[test]
    fn stops_at_first_success() {
        let providers = ProviderSet::new()
            .with(Box::new(FakeProvider::new(ProviderKind::YahooChart, &[("^VIX", 14.0)])))
            .with(Box::new(FakeProvider::new(ProviderKind::PolygonAggs, &[("I:VIX", 17.5)])));
        let spec = IndicatorSpec::new(IndicatorKey::Vix)
            .within(5.0, 100.0)
            .source(SourceAttempt::new(ProviderKind::YahooChart, "^VIX"))
            .source(SourceAttempt::new(ProviderKind::PolygonAggs, "I:VIX"));

        let resolver = Resolver::new(&NoTransport, &providers, window());
        let result = resolver.resolve(&spec).unwrap();
        assert_eq!(result.provenance.provider, ProviderKind::YahooChart);
    }

    #[test]
    fn transform_applies_before_range_check() {
        // 42.5 ÷ 10 = 4.25% is plausible; the raw 42.5 would not be.
        let providers = ProviderSet::new()
            .with(Box::new(FakeProvider::new(ProviderKind::PolygonAggs, &[("I:TNX", 42.5)])));
        let spec = IndicatorSpec::new(IndicatorKey::Tnx)
            .within(0.5, 15.0)
            .source(SourceAttempt::new(ProviderKind::PolygonAggs, "I:TNX").divided(10.0));

        let resolver = Resolver::new(&NoTransport, &providers, window());
        let result = resolver.resolve(&spec).unwrap();
        assert!((result.series.last_value().unwrap() - 4.25).abs() < 1e-12);
    }

    #[test]
    fn proxy_flag_carries_through() {
        let providers = ProviderSet::new()
            .with(Box::new(FakeProvider::new(ProviderKind::PolygonAggs, &[("UUP", 28.0)])));
        let spec = IndicatorSpec::new(IndicatorKey::Dxy)
            .within(80.0, 130.0)
            .source(SourceAttempt::new(ProviderKind::YahooChart, "DX-Y.NYB"))
            .source(SourceAttempt::new(ProviderKind::PolygonAggs, "UUP").scaled(3.7).proxy());

        let resolver = Resolver::new(&NoTransport, &providers, window());
        let result = resolver.resolve(&spec).unwrap();
        assert!(result.is_proxy);
        assert!((result.series.last_value().unwrap() - 103.6).abs() < 1e-9);
    }

    #[test]
    fn all_sources_failing_omits_indicator() {
        let providers = ProviderSet::new()
            .with(Box::new(FakeProvider::new(ProviderKind::YahooChart, &[("CL=F", -37.6)])))
            .with(Box::new(FakeProvider::new(ProviderKind::FredCsv, &[])));
        let specs = vec![IndicatorSpec::new(IndicatorKey::Cl)
            .within(20.0, 200.0)
            .source(SourceAttempt::new(ProviderKind::YahooChart, "CL=F"))
            .source(SourceAttempt::new(ProviderKind::FredCsv, "DCOILWTICO"))];

        let resolver = Resolver::new(&NoTransport, &providers, window());
        let set = resolver.resolve_all(&specs);
        assert!(set.is_empty());
        assert!(!set.contains(IndicatorKey::Cl));
        assert!(set.missing().contains(&IndicatorKey::Cl));
    }

    #[test]
    fn unconfigured_provider_is_skipped() {
        let providers = ProviderSet::new()
            .with(Box::new(FakeProvider::new(ProviderKind::YahooChart, &[("SPY", 512.0)])));
        let spec = IndicatorSpec::new(IndicatorKey::Spy)
            .source(SourceAttempt::new(ProviderKind::PolygonAggs, "SPY"))
            .source(SourceAttempt::new(ProviderKind::FinnhubCandles, "SPY"))
            .source(SourceAttempt::new(ProviderKind::YahooChart, "SPY"));

        let resolver = Resolver::new(&NoTransport, &providers, window());
        let result = resolver.resolve(&spec).unwrap();
        assert_eq!(result.provenance.to_string(), "yahoo_chart:SPY");
    }

    #[test]
    fn range_is_exclusive() {
        let r = PlausibleRange::new(5.0, 100.0);
        assert!(!r.contains(5.0));
        assert!(!r.contains(100.0));
        assert!(r.contains(5.01));
        assert!(!r.contains(f64::NAN));
    }
}
