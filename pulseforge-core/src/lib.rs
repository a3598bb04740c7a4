//! PulseForge Core: market-indicator acquisition, pulse scoring, predictions.
//!
//! This crate contains the parts of the daily pipeline that make decisions:
//! - Domain types (time series, indicator results, pulse series, predictions)
//! - The Transport boundary and a blocking HTTP implementation with backoff
//! - Provider adapters that map raw responses into canonical time series
//! - The indicator resolver: ordered fallback sources with unit transforms
//!   and plausibility checks
//! - The pulse scoring engine (weighted sub-signals per day)
//! - The prediction generator (trend, volatility, pulse momentum calls)

pub mod data;
pub mod domain;
pub mod indicators;
pub mod predict;
pub mod pulse;

pub use data::{
    DataError, FetchWindow, HttpTransport, IndicatorKey, IndicatorSpec, ProviderKind, ProviderSet,
    Resolver, Transport,
};
pub use domain::{Direction, IndicatorResult, Prediction, PulseSeries, TimeSeries};
pub use predict::predict;
pub use pulse::score;
