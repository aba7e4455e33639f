use serde::Serialize;

use super::aggregate::{aggregate, average_aggregate};
use super::compare::compare;
use super::error::AggregateError;
use super::types::{AggregateResult, Comparison, DailySeries, Metric, Window, ZeroDenominator};
use super::window::year_offset_window;

/// Multi-year average totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AverageResult {
    pub heating: f64,
    pub cooling: f64,
}

impl AverageResult {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Heating => self.heating,
            Metric::Cooling => self.cooling,
        }
    }
}

/// Current-window totals compared with one baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricComparisons {
    pub heating: Comparison,
    pub cooling: Comparison,
}

impl MetricComparisons {
    fn new(
        current: AggregateResult,
        heating_baseline: f64,
        cooling_baseline: f64,
        on_zero: ZeroDenominator,
    ) -> Result<Self, AggregateError> {
        Ok(Self {
            heating: compare(current.heating_total as f64, heating_baseline, on_zero)?,
            cooling: compare(current.cooling_total as f64, cooling_baseline, on_zero)?,
        })
    }

    pub fn get(&self, metric: Metric) -> &Comparison {
        match metric {
            Metric::Heating => &self.heating,
            Metric::Cooling => &self.cooling,
        }
    }
}

/// Everything a degree-day report says about one station and window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeDaySummary {
    pub window: Window,
    pub baseline_years: u32,
    pub current: AggregateResult,
    pub last_year: AggregateResult,
    pub average: AverageResult,
    pub vs_last_year: MetricComparisons,
    pub vs_average: MetricComparisons,
}

impl DegreeDaySummary {
    /// Aggregates `window`, the same window one year back, and the average
    /// over the last `baseline_years` years.
    pub fn compute(
        series: &DailySeries,
        window: Window,
        baseline_years: u32,
        on_zero: ZeroDenominator,
    ) -> Result<Self, AggregateError> {
        let current = aggregate(series, window);
        let last_year = aggregate(series, year_offset_window(window, 1)?);
        let (heating, cooling) = average_aggregate(series, window, baseline_years, on_zero)?;
        let average = AverageResult { heating, cooling };

        Ok(Self {
            window,
            baseline_years,
            current,
            last_year,
            average,
            vs_last_year: MetricComparisons::new(
                current,
                last_year.heating_total as f64,
                last_year.cooling_total as f64,
                on_zero,
            )?,
            vs_average: MetricComparisons::new(current, heating, cooling, on_zero)?,
        })
    }

    pub fn num_days(&self) -> u32 {
        self.window.len_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degree_days::types::{DailyRecord, Direction};
    use crate::degree_days::window::trailing_window;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_alternating_current_against_constant_baseline() {
        let window = trailing_window(date(2024, 1, 30), 30).unwrap();
        let baseline = year_offset_window(window, 1).unwrap();

        let current = window
            .days()
            .enumerate()
            .map(|(i, d)| DailyRecord::new(d, Some(if i % 2 == 0 { 10 } else { 20 }), Some(0)));
        let previous = baseline.days().map(|d| DailyRecord::new(d, Some(15), Some(0)));
        let series: DailySeries = current.chain(previous).collect();

        let summary =
            DegreeDaySummary::compute(&series, window, 1, ZeroDenominator::ReturnZero).unwrap();

        assert_eq!(summary.current.heating_total, 450);
        assert_eq!(summary.last_year.heating_total, 450);
        assert_eq!(summary.vs_last_year.heating.percent_change, 0.0);
        assert_eq!(summary.vs_last_year.heating.direction, Direction::Unchanged);
        assert_eq!(summary.average.heating, 450.0);
        assert_eq!(summary.num_days(), 30);
    }

    #[test]
    fn test_summary_without_history() {
        let window = trailing_window(date(2024, 8, 1), 7).unwrap();
        let series: DailySeries = window
            .days()
            .map(|d| DailyRecord::new(d, Some(0), Some(4)))
            .collect();

        let summary =
            DegreeDaySummary::compute(&series, window, 5, ZeroDenominator::ReturnZero).unwrap();

        assert_eq!(summary.current.cooling_total, 28);
        assert_eq!(summary.last_year, AggregateResult::default());
        assert_eq!(summary.vs_average.cooling.delta, 28.0);
        assert_eq!(summary.vs_average.cooling.percent_change, 0.0);
        assert_eq!(summary.vs_average.heating.direction, Direction::Unchanged);
    }

    #[test]
    fn test_summary_fail_policy_propagates() {
        let window = trailing_window(date(2024, 8, 1), 7).unwrap();
        let series: DailySeries = window
            .days()
            .map(|d| DailyRecord::new(d, Some(0), Some(4)))
            .collect();

        assert_eq!(
            DegreeDaySummary::compute(&series, window, 5, ZeroDenominator::Fail),
            Err(AggregateError::ZeroDenominator("percent change"))
        );
    }
}
