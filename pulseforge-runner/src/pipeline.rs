//! Pipeline driver: resolve indicators, score, predict, write documents.
//!
//! One sequential pass. Indicator and quote failures only thin out the
//! output; the only errors that abort a run are filesystem errors while
//! writing the documents.

use crate::config::{ApiKeys, PipelineConfig};
use crate::macro_notes::macro_notes;
use crate::output::{
    self, MacroDoc, MetricEntry, MetricsDoc, PredictionsDoc, PulseDoc, SectorsDoc, WatchlistDoc,
};
use crate::quotes::{quote_sources, QuoteFetcher};
use crate::volatility::volatility_doc;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use pulseforge_core::data::{
    standard_specs, Finnhub, FredCsv, PolygonAggs, QuoteSource, ResolvedSet, Throttle, YahooChart,
};
use pulseforge_core::{
    predict, score, FetchWindow, IndicatorKey, ProviderSet, PulseSeries, Resolver, Transport,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Timestamp format for `last_updated` (local time, microseconds).
pub const LAST_UPDATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Summary of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub resolved: Vec<IndicatorKey>,
    pub missing: Vec<IndicatorKey>,
    pub proxied: Vec<IndicatorKey>,
    pub pulse_days: usize,
    pub predictions: usize,
    pub files: Vec<PathBuf>,
    /// BLAKE3 over the resolved series.
    pub dataset_hash: String,
}

/// History providers available for the configured credentials. Keyless
/// providers are always present.
pub fn series_providers(keys: &ApiKeys) -> ProviderSet {
    let mut providers = ProviderSet::new()
        .with(Box::new(YahooChart::new()))
        .with(Box::new(FredCsv::new()));
    if let Some(key) = &keys.polygon {
        providers = providers.with(Box::new(PolygonAggs::new(key.clone())));
    }
    if let Some(key) = &keys.finnhub {
        providers = providers.with(Box::new(Finnhub::new(key.clone())));
    }
    providers
}

/// Deterministic hash of every resolved series, in key order.
pub fn compute_dataset_hash(resolved: &ResolvedSet) -> String {
    let mut hasher = blake3::Hasher::new();

    for result in resolved.iter() {
        hasher.update(result.key.as_str().as_bytes());
        hasher.update(&[u8::from(result.is_proxy)]);
        for (date, value) in result.series.dates().iter().zip(result.series.values()) {
            hasher.update(date.to_string().as_bytes());
            hasher.update(&value.to_le_bytes());
        }
        for volume in result.series.volumes() {
            hasher.update(&volume.to_le_bytes());
        }
    }

    hasher.finalize().to_hex().to_string()
}

pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    transport: &'a dyn Transport,
    providers: ProviderSet,
    quote_sources: Vec<Box<dyn QuoteSource>>,
    throttle: Throttle,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PipelineConfig, transport: &'a dyn Transport) -> Self {
        Self {
            config,
            transport,
            providers: series_providers(&config.keys),
            quote_sources: quote_sources(&config.keys),
            throttle: Throttle::new(config.quote_spacing()),
        }
    }

    /// Run every stage once. `now` is local wall-clock time.
    pub fn run(&self, now: NaiveDateTime) -> Result<RunReport> {
        let dir = &self.config.data_dir;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        let stamp = now.format(LAST_UPDATED_FORMAT).to_string();
        let mut files = Vec::new();

        info!(
            providers = ?self.providers.kinds(),
            config = %self.config.digest(),
            "fetching market data"
        );
        let window = FetchWindow::trailing(now.date(), self.config.history_days);
        let resolver = Resolver::new(self.transport, &self.providers, window);
        let resolved = resolver.resolve_all(&standard_specs());

        files.push(output::write_json(
            dir,
            output::METRICS_FILE,
            &self.metrics_doc(&stamp, &resolved),
        )?);

        info!(count = self.config.sectors.len(), "fetching sector quotes");
        let fetcher = QuoteFetcher::new(self.transport, &self.quote_sources, &self.throttle);
        let sectors = SectorsDoc {
            last_updated: stamp.clone(),
            sectors: fetcher.sectors(&self.config.sectors),
        };
        files.push(output::write_json(dir, output::SECTORS_FILE, &sectors)?);

        info!(count = self.config.watchlist.len(), "fetching watchlist quotes");
        let watchlist = WatchlistDoc {
            last_updated: stamp.clone(),
            stocks: fetcher.watchlist(
                &self.config.watchlist,
                self.config.watchlist_signal_threshold_pct,
            ),
        };
        files.push(output::write_json(dir, output::WATCHLIST_FILE, &watchlist)?);

        let spy = resolved.get(IndicatorKey::Spy).map(|r| &r.series);
        let vix = resolved.get(IndicatorKey::Vix).map(|r| &r.series);

        files.push(output::write_json(
            dir,
            output::VOLATILITY_FILE,
            &volatility_doc(&stamp, vix),
        )?);

        let pulse = match (spy, vix) {
            (Some(spy), Some(vix)) => score(spy, vix),
            _ => None,
        };
        if pulse.is_none() {
            warn!("pulse score unavailable: needs SPY and VIX with 20 aligned points");
        }
        let PulseSeries { dates, scores } = pulse.clone().unwrap_or_default();
        let pulse_days = scores.len();
        files.push(output::write_json(
            dir,
            output::PULSE_FILE,
            &PulseDoc {
                last_updated: stamp.clone(),
                dates,
                scores,
            },
        )?);

        let predictions = predict(spy, vix, pulse.as_ref());
        let prediction_count = predictions.len();
        files.push(output::write_json(
            dir,
            output::PREDICTIONS_FILE,
            &PredictionsDoc {
                last_updated: stamp.clone(),
                predictions,
            },
        )?);

        files.push(output::write_json(
            dir,
            output::MACRO_FILE,
            &MacroDoc {
                last_updated: stamp,
                notes: macro_notes(&resolved, &self.config.macro_footer),
            },
        )?);

        let report = RunReport {
            resolved: resolved.keys(),
            missing: resolved.missing(),
            proxied: resolved.iter().filter(|r| r.is_proxy).map(|r| r.key).collect(),
            pulse_days,
            predictions: prediction_count,
            files,
            dataset_hash: compute_dataset_hash(&resolved),
        };
        info!(
            resolved = report.resolved.len(),
            missing = ?report.missing,
            pulse_days = report.pulse_days,
            predictions = report.predictions,
            dataset_hash = %report.dataset_hash,
            "pipeline complete"
        );
        Ok(report)
    }

    fn metrics_doc(&self, stamp: &str, resolved: &ResolvedSet) -> MetricsDoc {
        let entry = |key: IndicatorKey| {
            resolved.get(key).map(|r| MetricEntry {
                values: r.series.tail_values(self.config.metrics_tail).to_vec(),
                proxy: r.is_proxy,
            })
        };
        MetricsDoc {
            last_updated: stamp.to_string(),
            spy: entry(IndicatorKey::Spy),
            vix: entry(IndicatorKey::Vix),
            dxy: entry(IndicatorKey::Dxy),
            tnx: entry(IndicatorKey::Tnx),
            btc: entry(IndicatorKey::Btc),
            cl: entry(IndicatorKey::Cl),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulseforge_core::data::ApiKey;
    use pulseforge_core::domain::Provenance;
    use pulseforge_core::{IndicatorResult, ProviderKind, TimeSeries};

    fn resolved_with(values: Vec<f64>) -> ResolvedSet {
        let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let dates = (0..values.len())
            .map(|i| base + chrono::Duration::days(i as i64))
            .collect();
        let mut set = ResolvedSet::default();
        set.insert(IndicatorResult {
            key: IndicatorKey::Vix,
            series: TimeSeries::from_values(dates, values).unwrap(),
            is_proxy: false,
            provenance: Provenance {
                provider: ProviderKind::YahooChart,
                symbol: "^VIX".into(),
            },
        });
        set
    }

    #[test]
    fn provider_set_follows_credentials() {
        assert_eq!(
            series_providers(&ApiKeys::default()).kinds(),
            vec![ProviderKind::YahooChart, ProviderKind::FredCsv]
        );
        let keyed = series_providers(&ApiKeys {
            polygon: ApiKey::new("p"),
            finnhub: ApiKey::new("f"),
        });
        assert_eq!(keyed.len(), 4);
    }

    #[test]
    fn dataset_hash_is_stable_and_sensitive() {
        let a = compute_dataset_hash(&resolved_with(vec![14.0, 15.0]));
        let b = compute_dataset_hash(&resolved_with(vec![14.0, 15.0]));
        let c = compute_dataset_hash(&resolved_with(vec![14.0, 15.5]));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn metrics_keep_the_tail() {
        let config = PipelineConfig {
            metrics_tail: 2,
            ..PipelineConfig::default()
        };
        let transport = pulseforge_core::data::FixtureTransport::new();
        let pipeline = Pipeline::new(&config, &transport);
        let doc = pipeline.metrics_doc("t", &resolved_with(vec![13.0, 14.0, 15.0]));
        assert_eq!(doc.vix.unwrap().values, vec![14.0, 15.0]);
        assert!(doc.spy.is_none());
    }
}
