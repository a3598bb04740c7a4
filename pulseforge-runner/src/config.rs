//! Pipeline configuration.
//!
//! Loaded once at process start from an optional TOML file plus two
//! credential environment variables, then passed by reference into the
//! pipeline. Every field has a default, so an empty file (or none at all) is
//! a valid configuration.

use pulseforge_core::data::{ApiKey, TransportConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "PULSEFORGE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "pulseforge.toml";
pub const POLYGON_KEY_ENV: &str = "POLYGON_API_KEY";
pub const FINNHUB_KEY_ENV: &str = "FINNHUB_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Provider credentials. Never serialized; `Debug` is redacted per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiKeys {
    pub polygon: Option<ApiKey>,
    pub finnhub: Option<ApiKey>,
}

impl ApiKeys {
    /// Read both keys from the process environment. Blank values count as unset.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().and_then(ApiKey::new);
        Self {
            polygon: read(POLYGON_KEY_ENV),
            finnhub: read(FINNHUB_KEY_ENV),
        }
    }
}

/// A sector ETF and its display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorEntry {
    pub symbol: String,
    pub name: String,
}

impl SectorEntry {
    fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    /// Pause between successive quote requests.
    pub quote_delay_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            timeout_secs: transport.timeout.as_secs(),
            max_retries: transport.max_retries,
            base_delay_ms: transport.base_delay.as_millis() as u64,
            quote_delay_ms: 250,
            user_agent: transport.user_agent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory the JSON documents are written to.
    pub data_dir: PathBuf,
    /// Calendar days of history requested per indicator.
    pub history_days: u32,
    /// Points kept per indicator in `metrics.json`.
    pub metrics_tail: usize,
    pub http: HttpConfig,
    pub watchlist: Vec<String>,
    /// Output order of `sectors.json`.
    pub sectors: Vec<SectorEntry>,
    pub watchlist_signal_threshold_pct: f64,
    /// Static lines appended to `macro.json`.
    pub macro_footer: Vec<String>,
    #[serde(skip)]
    pub keys: ApiKeys,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            history_days: 120,
            metrics_tail: 30,
            http: HttpConfig::default(),
            watchlist: ["TSLA", "PLTR", "AMZN", "HOOD", "SOFI", "RIVN", "NIO"]
                .into_iter()
                .map(String::from)
                .collect(),
            sectors: vec![
                SectorEntry::new("XLK", "Technology"),
                SectorEntry::new("XLF", "Financials"),
                SectorEntry::new("XLE", "Energy"),
                SectorEntry::new("XLV", "Healthcare"),
                SectorEntry::new("XLI", "Industrials"),
                SectorEntry::new("XLY", "Cons. Disc."),
                SectorEntry::new("XLP", "Cons. Staples"),
                SectorEntry::new("XLU", "Utilities"),
                SectorEntry::new("XLRE", "Real Estate"),
                SectorEntry::new("XLC", "Comms"),
                SectorEntry::new("XLB", "Materials"),
            ],
            watchlist_signal_threshold_pct: 1.5,
            macro_footer: vec![
                "Pipeline runs daily at 6 PM ET".into(),
                "Data sources: Polygon.io (price history), Finnhub (real-time quotes), \
                 Yahoo Finance and FRED (fallbacks)"
                    .into(),
            ],
            keys: ApiKeys::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from `$PULSEFORGE_CONFIG` (or `pulseforge.toml` if present) and
    /// read credentials from the environment.
    ///
    /// A missing default file is fine; a missing file named explicitly by
    /// the environment variable is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };
        Ok(config.with_keys(ApiKeys::from_env()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_keys(mut self, keys: ApiKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_days == 0 {
            return Err(ConfigError::Invalid("history_days must be at least 1".into()));
        }
        if self.metrics_tail == 0 {
            return Err(ConfigError::Invalid("metrics_tail must be at least 1".into()));
        }
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid("http.timeout_secs must be at least 1".into()));
        }
        let t = self.watchlist_signal_threshold_pct;
        if !t.is_finite() || t < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "watchlist_signal_threshold_pct must be a non-negative number, got {t}"
            )));
        }
        if let Some(s) = self.sectors.iter().find(|s| s.symbol.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("sector {:?} has no symbol", s.name)));
        }
        Ok(())
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            max_retries: self.http.max_retries,
            base_delay: Duration::from_millis(self.http.base_delay_ms),
            user_agent: self.http.user_agent.clone(),
        }
    }

    pub fn quote_spacing(&self) -> Duration {
        Duration::from_millis(self.http.quote_delay_ms)
    }

    /// Content hash of the non-secret settings, logged with each run.
    pub fn digest(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
