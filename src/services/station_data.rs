//! Trait for sources of daily station observations.

use anyhow::Result;

use degree_day_report::acis::StationHistory;
use degree_day_report::degree_days::Window;

/// Abstraction over a daily observation provider (e.g., RCC-ACIS).
#[async_trait::async_trait]
pub trait StationData: Send + Sync {
    /// Returns the station's name and its daily records for `range`.
    async fn station_history(&self, station: &str, range: Window) -> Result<StationHistory>;
}
