//! Heating/cooling degree-day aggregation and trend comparison.
//!
//! This module sums daily degree-day values over trailing windows, builds
//! same-period baselines from earlier years, and turns the difference into a
//! signed percentage with a display severity and color.

pub mod aggregate;
pub mod color;
pub mod compare;
pub mod error;
pub mod summary;
pub mod types;
pub mod window;

pub use aggregate::{aggregate, average_aggregate, average_over_years, window_sum};
pub use color::{color_for_severity, to_hex};
pub use compare::{classify, compare};
pub use error::AggregateError;
pub use summary::{AverageResult, DegreeDaySummary, MetricComparisons};
pub use types::{
    AggregateResult, Comparison, DailyRecord, DailySeries, Direction, Metric, Severity, Window,
    ZeroDenominator,
};
pub use window::{DAYS_PER_YEAR, history_window, trailing_window, year_offset_window};
