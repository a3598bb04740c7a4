//! FRED economic data adapter.
//!
//! `fredgraph.csv` returns two columns, a date and the observation. Missing
//! observations are written as `.` and are skipped.

use crate::data::provider::{DataError, FetchWindow, SeriesProvider, Transport};
use crate::domain::{ProviderKind, TimeSeries};
use chrono::NaiveDate;

const FRED_CSV_URL: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv";

#[derive(Debug, Default, Clone, Copy)]
pub struct FredCsv;

impl FredCsv {
    pub fn new() -> Self {
        Self
    }

    fn csv_url(&self, series_id: &str, window: &FetchWindow) -> String {
        format!(
            "{FRED_CSV_URL}?id={series_id}&cosd={}&coed={}",
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d"),
        )
    }
}

pub(crate) fn parse_csv(series_id: &str, body: &str) -> Result<TimeSeries, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut dates = Vec::new();
    let mut values = Vec::new();

    for record in reader.records() {
        let record = record
            .map_err(|e| DataError::ResponseFormat(format!("fred csv for {series_id}: {e}")))?;
        let (Some(raw_date), Some(raw_value)) = (record.get(0), record.get(1)) else {
            return Err(DataError::ResponseFormat(format!(
                "fred csv for {series_id}: expected two columns"
            )));
        };

        if raw_value.is_empty() || raw_value == "." {
            continue;
        }

        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
            DataError::ResponseFormat(format!("fred csv for {series_id}: date {raw_date:?}: {e}"))
        })?;
        let value: f64 = raw_value.parse().map_err(|e| {
            DataError::ResponseFormat(format!(
                "fred csv for {series_id}: value {raw_value:?}: {e}"
            ))
        })?;

        dates.push(date);
        values.push(value);
    }

    if values.is_empty() {
        return Err(DataError::NoData {
            symbol: series_id.to_string(),
        });
    }

    TimeSeries::from_values(dates, values)
        .map_err(|e| DataError::ResponseFormat(format!("fred csv for {series_id}: {e}")))
}

impl SeriesProvider for FredCsv {
    fn kind(&self) -> ProviderKind {
        ProviderKind::FredCsv
    }

    fn fetch_series(
        &self,
        transport: &dyn Transport,
        symbol: &str,
        window: &FetchWindow,
    ) -> Result<TimeSeries, DataError> {
        let body = transport.fetch_text(&self.csv_url(symbol, window))?;
        parse_csv(symbol, &body)
    }
}
