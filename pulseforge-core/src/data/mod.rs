//! Data acquisition: transport, provider adapters and the indicator resolver.

pub mod adapters;
pub mod catalog;
pub mod fixture;
pub mod provider;
pub mod resolver;
pub mod throttle;
pub mod transport;

pub use crate::domain::{IndicatorKey, ProviderKind};
pub use adapters::{ApiKey, Finnhub, FredCsv, PolygonAggs, Quote, QuoteSource, YahooChart};
pub use catalog::{standard_specs, DXY_PER_UUP, TNX_POINTS_PER_PERCENT};
pub use fixture::FixtureTransport;
pub use provider::{DataError, FetchWindow, ProviderSet, SeriesProvider, Transport};
pub use resolver::{IndicatorSpec, PlausibleRange, ResolvedSet, Resolver, SourceAttempt, UnitTransform};
pub use throttle::Throttle;
pub use transport::{HttpTransport, TransportConfig};
