//! Data types used by the degree-day aggregator.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::error::AggregateError;

/// The two degree-day measures reported for a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Heating,
    Cooling,
}

impl Metric {
    /// Short unit suffix used in reports (`HDD` / `CDD`).
    pub fn abbreviation(self) -> &'static str {
        match self {
            Metric::Heating => "HDD",
            Metric::Cooling => "CDD",
        }
    }

    /// Series label used in charts.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Heating => "Heating",
            Metric::Cooling => "Cooling",
        }
    }
}

/// One day of station observations.
///
/// `None` means the source reported a missing or non-numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub max_temp: Option<i32>,
    pub min_temp: Option<i32>,
    pub heating_dd: Option<u32>,
    pub cooling_dd: Option<u32>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, heating_dd: Option<u32>, cooling_dd: Option<u32>) -> Self {
        Self {
            date,
            max_temp: None,
            min_temp: None,
            heating_dd,
            cooling_dd,
        }
    }

    /// Degree days for `metric`, with unknown values counted as zero.
    pub fn value(&self, metric: Metric) -> u32 {
        match metric {
            Metric::Heating => self.heating_dd,
            Metric::Cooling => self.cooling_dd,
        }
        .unwrap_or(0)
    }
}

/// Daily records for one station, keyed uniquely by date.
#[derive(Debug, Clone, Default)]
pub struct DailySeries {
    records: BTreeMap<NaiveDate, DailyRecord>,
}

impl DailySeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing and returning any record already stored for that date.
    pub fn insert(&mut self, record: DailyRecord) -> Option<DailyRecord> {
        self.records.insert(record.date, record)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records.get(&date)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.keys().next_back().copied()
    }

    /// Records whose date falls inside `window`, in date order.
    pub fn range(&self, window: Window) -> impl Iterator<Item = &DailyRecord> {
        self.records.range(window.start..=window.end).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.values()
    }
}

impl FromIterator<DailyRecord> for DailySeries {
    fn from_iter<I: IntoIterator<Item = DailyRecord>>(iter: I) -> Self {
        let mut series = DailySeries::new();
        for record in iter {
            series.insert(record);
        }
        series
    }
}

/// A closed date interval `[start, end]`.
///
/// Construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Window {
    start: NaiveDate,
    end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AggregateError> {
        if start > end {
            return Err(AggregateError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, counting both endpoints.
    pub fn len_days(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every calendar day in the window, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Heating and cooling totals over one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub heating_total: u64,
    pub cooling_total: u64,
}

impl AggregateResult {
    pub fn total(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Heating => self.heating_total,
            Metric::Cooling => self.cooling_total,
        }
    }
}

/// Sign of `current - baseline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Above,
    Below,
    Unchanged,
}

/// Display classification of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Favorable,
    Unfavorable,
    Neutral,
}

/// A current value measured against a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub current: f64,
    pub baseline: f64,
    pub delta: f64,
    pub percent_change: f64,
    pub direction: Direction,
}

/// What a ratio does when its denominator is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ZeroDenominator {
    /// Report `0.0`.
    #[default]
    ReturnZero,
    /// Report the given sentinel value.
    Substitute(f64),
    /// Return [`AggregateError::ZeroDenominator`].
    Fail,
}

impl ZeroDenominator {
    pub(crate) fn resolve(self, what: &'static str) -> Result<f64, AggregateError> {
        match self {
            ZeroDenominator::ReturnZero => Ok(0.0),
            ZeroDenominator::Substitute(value) => Ok(value),
            ZeroDenominator::Fail => Err(AggregateError::ZeroDenominator(what)),
        }
    }
}
