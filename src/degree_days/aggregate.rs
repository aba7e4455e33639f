use super::error::AggregateError;
use super::types::{AggregateResult, DailySeries, Metric, Window, ZeroDenominator};
use super::window::year_offset_window;

/// Sums `metric` over every record dated inside `window`.
///
/// Unknown values and days without a record contribute zero.
pub fn window_sum(series: &DailySeries, window: Window, metric: Metric) -> u64 {
    series
        .range(window)
        .map(|record| u64::from(record.value(metric)))
        .sum()
}

/// Heating and cooling totals over `window`.
pub fn aggregate(series: &DailySeries, window: Window) -> AggregateResult {
    AggregateResult {
        heating_total: window_sum(series, window, Metric::Heating),
        cooling_total: window_sum(series, window, Metric::Cooling),
    }
}

/// Mean of the window sums for the same window 1..=`num_years` years back.
///
/// `num_years == 0` is resolved through `on_zero`.
pub fn average_over_years(
    series: &DailySeries,
    window: Window,
    metric: Metric,
    num_years: u32,
    on_zero: ZeroDenominator,
) -> Result<f64, AggregateError> {
    if num_years == 0 {
        return on_zero.resolve("multi-year average");
    }

    let mut total = 0u64;
    for years_back in 1..=num_years {
        total += window_sum(series, year_offset_window(window, years_back)?, metric);
    }

    Ok(total as f64 / f64::from(num_years))
}

/// [`average_over_years`] for both metrics, returned as `(heating, cooling)`.
pub fn average_aggregate(
    series: &DailySeries,
    window: Window,
    num_years: u32,
    on_zero: ZeroDenominator,
) -> Result<(f64, f64), AggregateError> {
    Ok((
        average_over_years(series, window, Metric::Heating, num_years, on_zero)?,
        average_over_years(series, window, Metric::Cooling, num_years, on_zero)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::degree_days::types::DailyRecord;
    use crate::degree_days::window::{DAYS_PER_YEAR, trailing_window};
    use chrono::{Days, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn heating(date: NaiveDate, hdd: u32) -> DailyRecord {
        DailyRecord::new(date, Some(hdd), Some(0))
    }

    #[test]
    fn test_window_sum_adds_values() {
        let series: DailySeries = [
            heating(date(2024, 1, 1), 10),
            heating(date(2024, 1, 2), 20),
            heating(date(2024, 1, 3), 5),
            heating(date(2024, 1, 4), 100),
        ]
        .into_iter()
        .collect();

        let window = Window::new(date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        assert_eq!(window_sum(&series, window, Metric::Heating), 35);
        assert_eq!(window_sum(&series, window, Metric::Cooling), 0);
    }

    #[test]
    fn test_window_sum_empty_window_is_zero() {
        let series = DailySeries::new();
        let window = trailing_window(date(2024, 1, 31), 30).unwrap();
        assert_eq!(window_sum(&series, window, Metric::Heating), 0);
    }

    #[test]
    fn test_window_sum_all_missing_is_zero() {
        let series: DailySeries = (1..=5)
            .map(|d| DailyRecord::new(date(2024, 1, d), None, None))
            .collect();
        let window = Window::new(date(2024, 1, 1), date(2024, 1, 5)).unwrap();
        assert_eq!(window_sum(&series, window, Metric::Heating), 0);
        assert_eq!(window_sum(&series, window, Metric::Cooling), 0);
    }

    #[test]
    fn test_aggregate_has_both_totals() {
        let series: DailySeries = [
            DailyRecord::new(date(2024, 7, 1), Some(1), Some(8)),
            DailyRecord::new(date(2024, 7, 2), None, Some(12)),
        ]
        .into_iter()
        .collect();
        let window = Window::new(date(2024, 7, 1), date(2024, 7, 2)).unwrap();

        assert_eq!(
            aggregate(&series, window),
            AggregateResult {
                heating_total: 1,
                cooling_total: 20
            }
        );
    }

    #[test]
    fn test_average_over_three_years() {
        let anchor = date(2024, 2, 10);
        let window = trailing_window(anchor, 1).unwrap();
        let series: DailySeries = [100, 150, 200]
            .into_iter()
            .enumerate()
            .map(|(i, hdd)| {
                let back = (i as u64 + 1) * DAYS_PER_YEAR;
                heating(anchor.checked_sub_days(Days::new(back)).unwrap(), hdd)
            })
            .collect();

        let avg = average_over_years(
            &series,
            window,
            Metric::Heating,
            3,
            ZeroDenominator::ReturnZero,
        )
        .unwrap();
        assert_eq!(avg, 150.0);
    }

    #[test]
    fn test_average_ignores_current_year() {
        let anchor = date(2024, 2, 10);
        let window = trailing_window(anchor, 1).unwrap();
        let series: DailySeries = [heating(anchor, 999)].into_iter().collect();

        let avg =
            average_over_years(&series, window, Metric::Heating, 2, ZeroDenominator::Fail).unwrap();
        assert_eq!(avg, 0.0);
    }

    #[test]
    fn test_average_zero_years_follows_policy() {
        let series = DailySeries::new();
        let window = trailing_window(date(2024, 2, 10), 7).unwrap();

        assert_eq!(
            average_over_years(&series, window, Metric::Heating, 0, ZeroDenominator::ReturnZero),
            Ok(0.0)
        );
        assert_eq!(
            average_over_years(&series, window, Metric::Heating, 0, ZeroDenominator::Fail),
            Err(AggregateError::ZeroDenominator("multi-year average"))
        );
    }
}
