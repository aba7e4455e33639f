use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::services::station_data::StationData;
use degree_day_report::acis::{StationHistory, StnDataRequest, parse_response};
use degree_day_report::degree_days::Window;
use degree_day_report::fetch::{HttpClient, post_form};

/// Fetches daily observations from the RCC-ACIS `StnData` endpoint.
pub struct AcisClient<C> {
    client: C,
    url: String,
}

impl<C: HttpClient> AcisClient<C> {
    pub fn new(client: C, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl<C: HttpClient> StationData for AcisClient<C> {
    #[tracing::instrument(skip(self, range), fields(range = %range))]
    async fn station_history(&self, station: &str, range: Window) -> Result<StationHistory> {
        let request = StnDataRequest::new(station, range);

        let bytes = post_form(&self.client, &self.url, &request)
            .await
            .with_context(|| format!("ACIS request failed for station '{station}'"))?;

        let history = parse_response(&bytes)
            .with_context(|| format!("unreadable ACIS response for station '{station}'"))?;

        info!(
            name = %history.name,
            records = history.series.len(),
            "Station history fetched"
        );
        Ok(history)
    }
}
