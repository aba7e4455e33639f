//! Weekly degree-day forecast from the NOAA Climate Prediction Center.
//!
//! The feed is a fixed-width text report. Only two things are read from it:
//! the forecast week's end date and one region's row of figures.

use tracing::warn;

pub const DEFAULT_FORECAST_URL: &str =
    "https://www.cpc.ncep.noaa.gov/products/analysis_monitoring/cdus/degree_days/hfstwpws.txt";

pub const DEFAULT_REGION: &str = "ILLINOIS";

const WEEK_MARKER: &str = "LAST DATE OF FORECAST WEEK IS ";

/// Figures from the region's row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastFigures {
    pub forecast: i64,
    pub deviation_from_normal: i64,
    pub deviation_from_last_year: i64,
}

/// Whatever could be read from the feed. Absent parts stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forecast {
    pub week_ending: Option<String>,
    pub figures: Option<ForecastFigures>,
}

impl Forecast {
    pub fn is_empty(&self) -> bool {
        self.week_ending.is_none() && self.figures.is_none()
    }
}

/// Reads the forecast week and `region`'s figures out of the feed text.
///
/// Never fails: a missing line or a malformed number only leaves the
/// corresponding field empty.
pub fn parse_forecast(text: &str, region: &str) -> Forecast {
    let mut forecast = Forecast::default();
    let mut region_row = None;

    for line in text.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(region) {
            region_row = Some(rest);
        } else if let Some(rest) = line.strip_prefix(WEEK_MARKER) {
            forecast.week_ending = Some(rest.trim().to_string());
        }
    }

    match region_row {
        Some(row) => {
            forecast.figures = parse_figures(row);
            if forecast.figures.is_none() {
                warn!(region, row, "Forecast row is malformed");
            }
        }
        None => warn!(region, "Forecast region not found"),
    }

    if forecast.week_ending.is_none() {
        warn!("Forecast week marker not found");
    }

    forecast
}

fn parse_figures(row: &str) -> Option<ForecastFigures> {
    let fields: Vec<&str> = row.split_whitespace().collect();
    if fields.len() < 4 {
        return None;
    }

    let number = |s: &str| s.replace(',', "").parse::<i64>().ok();
    Some(ForecastFigures {
        forecast: number(fields[0])?,
        deviation_from_normal: number(fields[1])?,
        deviation_from_last_year: number(fields[2])?,
    })
}
