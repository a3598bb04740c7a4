//! PulseForge Runner: the daily pipeline around the core engine.
//!
//! This crate provides:
//! - Configuration: TOML file + credential environment variables, loaded once
//! - Quote snapshots for sector ETFs and the watchlist
//! - Output documents (`metrics.json`, `sectors.json`, `watchlist.json`,
//!   `volatility.json`, `pulse.json`, `predictions.json`, `macro.json`)
//! - The pipeline driver that wires resolver, scoring and predictions together

pub mod config;
pub mod macro_notes;
pub mod output;
pub mod pipeline;
pub mod quotes;
pub mod volatility;

pub use config::{ApiKeys, ConfigError, PipelineConfig};
pub use pipeline::{Pipeline, RunReport};
