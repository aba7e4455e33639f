//! Location sheet parsing.
//!
//! The sheet is a CSV export with one row per report: `Station`, `Period`
//! (window length in days) and `Emails` (comma-separated recipients).

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Published location sheet used when no other source is configured.
pub const DEFAULT_LOCATIONS_URL: &str = "https://docs.google.com/spreadsheets/d/19i_H7oA_fkJR5aU4FdeoInlOuI9-hwWqx9E-9TvH6To/pub?gid=0&single=true&output=csv";

#[derive(Debug, Deserialize)]
struct LocationRow {
    #[serde(rename = "Station")]
    station: String,
    #[serde(rename = "Period")]
    period: String,
    #[serde(rename = "Emails", default)]
    emails: String,
}

/// One report to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub station: String,
    pub num_days: u32,
    pub recipients: Vec<String>,
}

/// A sheet row that could not be turned into a [`Location`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line number in the CSV, header included.
    pub line: u64,
    pub station: String,
    pub reason: String,
}

/// Parsed sheet: usable locations in input order plus the rows that were rejected.
#[derive(Debug, Default)]
pub struct LocationSheet {
    pub locations: Vec<Location>,
    pub rejected: Vec<RejectedRow>,
}

/// Parses the location sheet.
///
/// # Errors
///
/// Fails only when the header row is unreadable; malformed or short rows end
/// up in [`LocationSheet::rejected`].
pub fn parse_locations(bytes: &[u8]) -> Result<LocationSheet> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr.headers()?.clone();
    let mut sheet = LocationSheet::default();

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                sheet.rejected.push(RejectedRow {
                    line: e.position().map_or(0, |p| p.line()),
                    station: String::new(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());
        let row: LocationRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                sheet.rejected.push(RejectedRow {
                    line,
                    station: record.get(0).unwrap_or_default().to_string(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if row.station.is_empty() {
            continue;
        }

        match row.period.parse::<u32>() {
            Ok(num_days) if num_days > 0 => sheet.locations.push(Location {
                station: row.station,
                num_days,
                recipients: split_recipients(&row.emails),
            }),
            _ => sheet.rejected.push(RejectedRow {
                line,
                station: row.station,
                reason: format!("period '{}' is not a positive number of days", row.period),
            }),
        }
    }

    Ok(sheet)
}

/// Splits a comma-separated address list, dropping blanks.
pub fn split_recipients(emails: &str) -> Vec<String> {
    emails
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
