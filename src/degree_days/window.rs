use chrono::{Days, NaiveDate};

use super::error::AggregateError;
use super::types::Window;

/// Length of one baseline year. Leap days are not adjusted for.
pub const DAYS_PER_YEAR: u64 = 365;

/// Returns `[anchor - num_days + 1, anchor]`.
///
/// Reports anchor on yesterday, since the current day's values are not final.
pub fn trailing_window(anchor: NaiveDate, num_days: u32) -> Result<Window, AggregateError> {
    if num_days == 0 {
        return Err(AggregateError::EmptyWindow);
    }
    let start = shift_back(anchor, u64::from(num_days) - 1)?;
    Window::new(start, anchor)
}

/// Shifts both ends of `window` back by `years_back * 365` days.
pub fn year_offset_window(window: Window, years_back: u32) -> Result<Window, AggregateError> {
    let days = u64::from(years_back) * DAYS_PER_YEAR;
    Window::new(shift_back(window.start(), days)?, shift_back(window.end(), days)?)
}

/// The range of history needed to compare `current` with `baseline_years` earlier years.
pub fn history_window(current: Window, baseline_years: u32) -> Result<Window, AggregateError> {
    let oldest = year_offset_window(current, baseline_years)?;
    Window::new(oldest.start(), current.end())
}

fn shift_back(date: NaiveDate, days: u64) -> Result<NaiveDate, AggregateError> {
    date.checked_sub_days(Days::new(days))
        .ok_or(AggregateError::DateOutOfRange { date, days })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trailing_window_ends_on_anchor() {
        let window = trailing_window(date(2024, 1, 30), 30).unwrap();
        assert_eq!(window.start(), date(2024, 1, 1));
        assert_eq!(window.end(), date(2024, 1, 30));
        assert_eq!(window.len_days(), 30);
    }

    #[test]
    fn test_trailing_window_single_day() {
        let window = trailing_window(date(2024, 3, 1), 1).unwrap();
        assert_eq!(window.start(), window.end());
    }

    #[test]
    fn test_trailing_window_zero_days_is_rejected() {
        assert_eq!(
            trailing_window(date(2024, 3, 1), 0),
            Err(AggregateError::EmptyWindow)
        );
    }

    #[test]
    fn test_year_offset_zero_is_identity() {
        let window = trailing_window(date(2024, 6, 15), 14).unwrap();
        assert_eq!(year_offset_window(window, 0).unwrap(), window);
    }

    #[test]
    fn test_year_offset_composes() {
        let window = trailing_window(date(2024, 6, 15), 14).unwrap();
        let twice = year_offset_window(year_offset_window(window, 1).unwrap(), 1).unwrap();
        assert_eq!(twice, year_offset_window(window, 2).unwrap());
    }

    #[test]
    fn test_year_offset_uses_fixed_365_days() {
        // 2024 is a leap year, so 365 days back from March 1 lands on March 2.
        let window = trailing_window(date(2024, 3, 1), 1).unwrap();
        let shifted = year_offset_window(window, 1).unwrap();
        assert_eq!(shifted.end(), date(2023, 3, 2));
        assert_eq!(shifted.len_days(), 1);
    }

    #[test]
    fn test_history_window_covers_oldest_baseline() {
        let current = trailing_window(date(2024, 1, 30), 30).unwrap();
        let history = history_window(current, 5).unwrap();
        assert_eq!(history.end(), current.end());
        assert_eq!(history.start(), year_offset_window(current, 5).unwrap().start());
    }

    #[test]
    fn test_shift_out_of_range() {
        let window = trailing_window(NaiveDate::MIN, 1).unwrap();
        assert!(matches!(
            year_offset_window(window, 1),
            Err(AggregateError::DateOutOfRange { .. })
        ));
    }
}
