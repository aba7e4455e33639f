//! PNG chart of daily heating and cooling degree days.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::degree_days::{DailySeries, Metric, Window};

pub const CHART_SIZE: (u32, u32) = (1024, 640);

const PINK: RGBColor = RGBColor(0xff, 0xc0, 0xcb);

/// Where the chart for `station` and `num_days` is written.
pub fn chart_path(output_dir: &Path, station: &str, num_days: u32) -> PathBuf {
    let station: String = station
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    output_dir.join(format!("{station}_{num_days}_dd.png"))
}

/// Chart caption for a station.
pub fn chart_title(station_name: &str, num_days: u32) -> String {
    format!("Degree Days for {station_name}, Last {num_days} Days")
}

/// Upper bound of the y axis: the peak value plus a tenth of headroom.
fn y_axis_top(peak: u32) -> u32 {
    peak.saturating_add(peak / 10).saturating_add(1)
}

/// Renders heating and cooling lines for the days in `window` to `path`.
pub fn render_chart(path: &Path, title: &str, series: &DailySeries, window: Window) -> Result<()> {
    let y_max = series
        .range(window)
        .flat_map(|r| [r.value(Metric::Heating), r.value(Metric::Cooling)])
        .max()
        .unwrap_or(0)
        .max(1);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(window.start()..window.end(), 0u32..y_axis_top(y_max))
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Degree Days")
        .x_label_formatter(&|d: &NaiveDate| d.format("%b %d").to_string())
        .draw()
        .map_err(chart_error)?;

    for (metric, color) in [(Metric::Cooling, BLUE), (Metric::Heating, PINK)] {
        chart
            .draw_series(LineSeries::new(
                series.range(window).map(|r| (r.date, r.value(metric))),
                color.stroke_width(2),
            ))
            .map_err(chart_error)?
            .label(metric.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    debug!(path = %path.display(), "Chart written");
    Ok(())
}

fn chart_error<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("chart rendering failed: {e}")
}
