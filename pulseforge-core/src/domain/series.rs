//! Canonical daily time series and the pulse score series.
//!
//! A `TimeSeries` is what every provider adapter produces, whatever the
//! upstream shape: parallel vectors of dates, values and (optionally) volumes.
//! The length invariants are checked once at construction so downstream code
//! can index the vectors in lockstep.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("length mismatch: {dates} dates vs {values} values")]
    ValueLengthMismatch { dates: usize, values: usize },

    #[error("length mismatch: {volumes} volumes vs {values} values")]
    VolumeLengthMismatch { volumes: usize, values: usize },

    #[error("non-finite value at index {index}")]
    NonFinite { index: usize },
}

/// Ordered daily observations for one instrument.
///
/// `volumes` is either empty (the source has no volume) or the same length
/// as `values`. Deserialization goes through the same checks as `new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries")]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    volumes: Vec<u64>,
}

#[derive(Deserialize)]
struct RawSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    #[serde(default)]
    volumes: Vec<u64>,
}

impl TryFrom<RawSeries> for TimeSeries {
    type Error = SeriesError;

    fn try_from(raw: RawSeries) -> Result<Self, Self::Error> {
        Self::new(raw.dates, raw.values, raw.volumes)
    }
}

impl TimeSeries {
    pub fn new(
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
        volumes: Vec<u64>,
    ) -> Result<Self, SeriesError> {
        if dates.len() != values.len() {
            return Err(SeriesError::ValueLengthMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        if !volumes.is_empty() && volumes.len() != values.len() {
            return Err(SeriesError::VolumeLengthMismatch {
                volumes: volumes.len(),
                values: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SeriesError::NonFinite { index });
        }
        Ok(Self {
            dates,
            values,
            volumes,
        })
    }

    /// Series without volume data.
    pub fn from_values(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self, SeriesError> {
        Self::new(dates, values, Vec::new())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn volumes(&self) -> &[u64] {
        &self.volumes
    }

    pub fn has_volume(&self) -> bool {
        !self.volumes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// The last `n` values (or all of them if the series is shorter).
    pub fn tail_values(&self, n: usize) -> &[f64] {
        &self.values[self.values.len().saturating_sub(n)..]
    }

    /// Apply a unit transform to every value. Dates and volumes are untouched.
    pub fn map_values(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            values: self.values.into_iter().map(f).collect(),
            ..self
        }
    }
}

/// Per-day composite scores aligned with a suffix of the benchmark's dates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PulseSeries {
    pub dates: Vec<NaiveDate>,
    pub scores: Vec<f64>,
}

impl PulseSeries {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(n: usize) -> Vec<NaiveDate> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        (0..n)
            .map(|i| base + chrono::Duration::days(i as i64))
            .collect()
    }

    #[test]
    fn deserialize_runs_construction_checks() {
        let ok: TimeSeries =
            serde_json::from_str(r#"{"dates":["2024-01-02"],"values":[13.5]}"#).unwrap();
        assert_eq!(ok.values(), &[13.5]);
        assert!(!ok.has_volume());

        let short = serde_json::from_str::<TimeSeries>(
            r#"{"dates":["2024-01-02","2024-01-03"],"values":[13.5]}"#,
        );
        assert!(short.unwrap_err().to_string().contains("length mismatch"));

        let volumes = serde_json::from_str::<TimeSeries>(
            r#"{"dates":["2024-01-02"],"values":[13.5],"volumes":[1,2]}"#,
        );
        assert!(volumes.is_err());
    }

    #[test]
    fn dates_are_kept_as_delivered() {
        let d = days(2);
        let dates = vec![d[1], d[0], d[0]];
        let ts = TimeSeries::from_values(dates.clone(), vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ts.dates(), dates.as_slice());
    }

    #[test]
    fn serialize_then_deserialize_keeps_series() {
        let ts = TimeSeries::new(days(2), vec![1.0, 2.0], vec![10, 20]).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(serde_json::from_str::<TimeSeries>(&json).unwrap(), ts);
    }

    #[test]
    fn rejects_value_length_mismatch() {
        let err = TimeSeries::new(days(3), vec![1.0, 2.0], vec![]).unwrap_err();
        assert_eq!(err, SeriesError::ValueLengthMismatch { dates: 3, values: 2 });
    }

    #[test]
    fn rejects_partial_volumes() {
        let err = TimeSeries::new(days(2), vec![1.0, 2.0], vec![10]).unwrap_err();
        assert_eq!(err, SeriesError::VolumeLengthMismatch { volumes: 1, values: 2 });
    }

    #[test]
    fn rejects_nan() {
        let err = TimeSeries::from_values(days(2), vec![1.0, f64::NAN]).unwrap_err();
        assert_eq!(err, SeriesError::NonFinite { index: 1 });
    }

    #[test]
    fn empty_volumes_are_allowed() {
        let ts = TimeSeries::from_values(days(3), vec![1.0, 2.0, 3.0]).unwrap();
        assert!(!ts.has_volume());
        assert_eq!(ts.last_value(), Some(3.0));
    }

    #[test]
    fn tail_values_clamps_to_length() {
        let ts = TimeSeries::from_values(days(3), vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(ts.tail_values(2), &[2.0, 3.0]);
        assert_eq!(ts.tail_values(10), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn map_values_keeps_dates() {
        let ts = TimeSeries::new(days(2), vec![40.0, 42.0], vec![5, 6]).unwrap();
        let scaled = ts.clone().map_values(|v| v / 10.0);
        assert_eq!(scaled.values(), &[4.0, 4.2]);
        assert_eq!(scaled.dates(), ts.dates());
        assert_eq!(scaled.volumes(), &[5, 6]);
    }
}
