//! Request and response types for the RCC-ACIS `StnData` web service.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

use crate::degree_days::{DailyRecord, DailySeries, Window};

pub const DEFAULT_ACIS_URL: &str = "https://data.rcc-acis.org/StnData";

/// Elements requested per day, in response column order after the date.
pub const ELEMENTS: [&str; 4] = ["maxt", "mint", "hdd", "cdd"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Form payload for a `StnData` request.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StnDataRequest {
    pub sid: String,
    pub sdate: String,
    pub edate: String,
    pub elems: String,
}

impl StnDataRequest {
    pub fn new(station: &str, range: Window) -> Self {
        Self {
            sid: station.to_string(),
            sdate: range.start().format(DATE_FORMAT).to_string(),
            edate: range.end().format(DATE_FORMAT).to_string(),
            elems: ELEMENTS.join(","),
        }
    }
}

#[derive(Deserialize)]
struct StnDataResponse {
    #[serde(default)]
    meta: Option<StationMeta>,
    #[serde(default)]
    data: Vec<Vec<Value>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct StationMeta {
    name: Option<String>,
}

/// A station's display name and its daily records.
#[derive(Debug, Clone)]
pub struct StationHistory {
    pub name: String,
    pub series: DailySeries,
}

/// Decodes a `StnData` JSON body.
///
/// Cells that are not plain numbers (`M`, `T`, `12A`, ...) become unknown.
/// Rows with an unreadable date are skipped.
///
/// # Errors
///
/// Returns an error if the body is not JSON or the service reported an error.
pub fn parse_response(bytes: &[u8]) -> Result<StationHistory> {
    let response: StnDataResponse = serde_json::from_slice(bytes)?;

    if let Some(error) = response.error {
        return Err(anyhow!("ACIS returned an error: {error}"));
    }

    let name = response
        .meta
        .and_then(|m| m.name)
        .unwrap_or_else(|| "Unknown station".to_string());

    let mut series = DailySeries::new();
    for row in &response.data {
        match parse_row(row) {
            Some(record) => {
                series.insert(record);
            }
            None => warn!(row = ?row, "Skipping ACIS row without a valid date"),
        }
    }

    Ok(StationHistory { name, series })
}

fn parse_row(row: &[Value]) -> Option<DailyRecord> {
    let date = NaiveDate::parse_from_str(row.first()?.as_str()?, DATE_FORMAT).ok()?;
    let cell = |i: usize| row.get(i).and_then(Value::as_str);

    Some(DailyRecord {
        date,
        max_temp: cell(1).and_then(parse_value),
        min_temp: cell(2).and_then(parse_value),
        heating_dd: cell(3).and_then(parse_value),
        cooling_dd: cell(4).and_then(parse_value),
    })
}

/// Parses a numeric cell; flags and sentinels yield `None`.
pub fn parse_value<T: FromStr>(cell: &str) -> Option<T> {
    cell.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degree_days::trailing_window;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_request_payload() {
        let window = trailing_window(date(2024, 1, 30), 30).unwrap();
        let request = StnDataRequest::new("ORDthr", window);

        assert_eq!(request.sid, "ORDthr");
        assert_eq!(request.sdate, "2024-01-01");
        assert_eq!(request.edate, "2024-01-30");
        assert_eq!(request.elems, "maxt,mint,hdd,cdd");
    }

    #[test]
    fn test_parse_response_with_sentinels() {
        let body = br#"{
            "meta": {"name": "CHICAGO OHARE INTL AP", "state": "IL"},
            "data": [
                ["2024-01-01", "35", "20", "37", "0"],
                ["2024-01-02", "M", "-4", "M", "T"],
                ["2024-01-03", "41", "30", "12A", "0"]
            ]
        }"#;

        let history = parse_response(body).unwrap();
        assert_eq!(history.name, "CHICAGO OHARE INTL AP");
        assert_eq!(history.series.len(), 3);

        let first = history.series.get(date(2024, 1, 1)).unwrap();
        assert_eq!(first.max_temp, Some(35));
        assert_eq!(first.heating_dd, Some(37));
        assert_eq!(first.cooling_dd, Some(0));

        let second = history.series.get(date(2024, 1, 2)).unwrap();
        assert_eq!(second.max_temp, None);
        assert_eq!(second.min_temp, Some(-4));
        assert_eq!(second.heating_dd, None);
        assert_eq!(second.cooling_dd, None);

        let third = history.series.get(date(2024, 1, 3)).unwrap();
        assert_eq!(third.heating_dd, None);
    }

    #[test]
    fn test_parse_response_skips_bad_dates() {
        let body = br#"{"meta": {"name": "X"}, "data": [["not-a-date", "1", "1", "1", "1"], ["2024-02-01", "1", "1", "1", "1"]]}"#;
        let history = parse_response(body).unwrap();
        assert_eq!(history.series.len(), 1);
    }

    #[test]
    fn test_parse_response_reports_service_error() {
        let body = br#"{"error": "no data available"}"#;
        let err = parse_response(body).unwrap_err();
        assert!(err.to_string().contains("no data available"));
    }

    #[test]
    fn test_parse_response_invalid_json() {
        assert!(parse_response(b"<html>").is_err());
    }

    #[test]
    fn test_parse_value_rejects_flags() {
        assert_eq!(parse_value::<u32>("12"), Some(12));
        assert_eq!(parse_value::<u32>(" 7 "), Some(7));
        assert_eq!(parse_value::<u32>("M"), None);
        assert_eq!(parse_value::<u32>("T"), None);
        assert_eq!(parse_value::<u32>("-3"), None);
        assert_eq!(parse_value::<i32>("-3"), Some(-3));
    }
}
