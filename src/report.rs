//! Plain-text and HTML bodies for the degree-day email.

use std::fmt::Write;

use crate::degree_days::{
    Comparison, DegreeDaySummary, Metric, classify, color_for_severity, to_hex,
};
use crate::forecast::Forecast;
use crate::format::{format_decimal, format_int, format_percent};

/// A composed email, ready for MIME assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Forecast section inputs.
#[derive(Clone, Copy)]
pub struct ForecastSection<'a> {
    pub forecast: &'a Forecast,
    pub source_url: &'a str,
}

/// Builds the report for `station_name` from a computed summary.
pub fn compose(
    station_name: &str,
    summary: &DegreeDaySummary,
    forecast: Option<ForecastSection<'_>>,
) -> Report {
    let name_html = escape_html(station_name);
    let mut text = format!("Degree Days report for {station_name}\n\n");
    let mut html = format!("<h2>Degree Days report for {name_html}</h2>");

    let current = summary.current;
    let _ = writeln!(
        text,
        "Last {} days: {} HDD, {} CDD",
        summary.num_days(),
        format_int(current.heating_total as i64, true),
        format_int(current.cooling_total as i64, true),
    );
    let _ = write!(
        html,
        "<p>Last {} days: <strong>{}</strong> HDD, <strong>{}</strong> CDD<br>",
        summary.num_days(),
        format_int(current.heating_total as i64, true),
        format_int(current.cooling_total as i64, true),
    );

    let last_year = summary.last_year;
    let _ = writeln!(
        text,
        "Same time period last year: {} HDD, {} CDD ({})",
        format_int(last_year.heating_total as i64, true),
        format_int(last_year.cooling_total as i64, true),
        text_changes(&summary.vs_last_year.heating, &summary.vs_last_year.cooling),
    );
    let _ = write!(
        html,
        "Same time period last year: <strong>{}</strong> HDD, <strong>{}</strong> CDD ({})",
        format_int(last_year.heating_total as i64, true),
        format_int(last_year.cooling_total as i64, true),
        html_changes(&summary.vs_last_year.heating, &summary.vs_last_year.cooling),
    );

    // No baseline years, no average to report
    if summary.baseline_years > 0 {
        let years = years_phrase(summary.baseline_years);
        let average = summary.average;
        let _ = writeln!(
            text,
            "Same time period {years} (avg): {} HDD, {} CDD ({})",
            format_decimal(average.heating, 1, true),
            format_decimal(average.cooling, 1, true),
            text_changes(&summary.vs_average.heating, &summary.vs_average.cooling),
        );
        let _ = write!(
            html,
            "<br>Same time period {years} (avg): <strong>{}</strong> HDD, <strong>{}</strong> CDD ({})",
            format_decimal(average.heating, 1, true),
            format_decimal(average.cooling, 1, true),
            html_changes(&summary.vs_average.heating, &summary.vs_average.cooling),
        );
    }
    html.push_str("</p>");

    if let Some(section) = forecast {
        append_forecast(&mut text, &mut html, &section);
    }

    Report {
        subject: format!("Degree Days for {station_name}"),
        text,
        html,
    }
}

fn append_forecast(text: &mut String, html: &mut String, section: &ForecastSection<'_>) {
    let forecast = section.forecast;
    if forecast.is_empty() {
        return;
    }
    let url = section.source_url;

    if let Some(week) = &forecast.week_ending {
        let _ = writeln!(
            text,
            "\nDegree Day forecast (statewide), following week as of {week}\n\
             Courtesy NOAA Climate Prediction Center: {url}"
        );
        let _ = write!(
            html,
            "<h4>Degree Day forecast (statewide), following week as of {}</h4>\
             <p>Courtesy <a href=\"{}\">NOAA Climate Prediction Center</a></p>",
            escape_html(week),
            escape_html(url),
        );
    }

    if let Some(figures) = forecast.figures {
        let _ = writeln!(
            text,
            "Forecast: {}\nDeviation from normal: {}\nDeviation from last year: {}",
            format_int(figures.forecast, true),
            format_int(figures.deviation_from_normal, true),
            format_int(figures.deviation_from_last_year, true),
        );
        let _ = write!(
            html,
            "<p>Forecast: <strong>{}</strong> degree days next week<br>\
             Deviation from normal: <strong>{}</strong> degree days<br>\
             Deviation from last year: <strong>{}</strong> degree days</p>",
            format_int(figures.forecast, true),
            format_int(figures.deviation_from_normal, true),
            format_int(figures.deviation_from_last_year, true),
        );
    }
}

fn text_changes(heating: &Comparison, cooling: &Comparison) -> String {
    format!(
        "now {} {}, {} {}",
        format_percent(heating.percent_change),
        Metric::Heating.abbreviation(),
        format_percent(cooling.percent_change),
        Metric::Cooling.abbreviation(),
    )
}

fn html_changes(heating: &Comparison, cooling: &Comparison) -> String {
    format!(
        "now {} {}, {} {}",
        colored_percent(heating, Metric::Heating),
        Metric::Heating.abbreviation(),
        colored_percent(cooling, Metric::Cooling),
        Metric::Cooling.abbreviation(),
    )
}

fn colored_percent(comparison: &Comparison, metric: Metric) -> String {
    let color = color_for_severity(comparison.percent_change, classify(comparison, metric));
    format!(
        "<span style=\"color: {}\">{}</span>",
        to_hex(color),
        format_percent(comparison.percent_change)
    )
}

fn years_phrase(years: u32) -> String {
    const WORDS: [&str; 10] = [
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    ];
    match years {
        1 => "last year".to_string(),
        2..=10 => format!("last {} years", WORDS[years as usize - 1]),
        n => format!("last {n} years"),
    }
}

/// Escapes text for inclusion in HTML element content or attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
