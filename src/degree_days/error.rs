use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("window length must be at least one day")]
    EmptyWindow,

    #[error("window start {start} is after its end {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },

    #[error("shifting {date} by {days} days leaves the supported date range")]
    DateOutOfRange { date: NaiveDate, days: u64 },

    #[error("{0} has a zero denominator")]
    ZeroDenominator(&'static str),
}
