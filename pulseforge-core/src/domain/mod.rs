//! Domain types shared by the resolver, the scoring engine and the runner.

pub mod indicator;
pub mod prediction;
pub mod series;

pub use indicator::{IndicatorKey, IndicatorResult, Provenance, ProviderKind};
pub use prediction::{Direction, Prediction};
pub use series::{PulseSeries, SeriesError, TimeSeries};
