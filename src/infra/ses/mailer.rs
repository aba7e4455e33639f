use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_ses::config::Region;
use aws_sdk_ses::primitives::Blob;
use aws_sdk_ses::types::RawMessage;
use tracing::debug;

use crate::services::mailer::Mailer;

/// Sends raw messages through Amazon SES `SendRawEmail`.
pub struct SesMailer {
    client: aws_sdk_ses::Client,
}

impl SesMailer {
    /// Loads AWS configuration from the environment, optionally from a named
    /// profile, and pins the SES region.
    pub async fn new(profile: Option<&str>, region: &str) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        Self {
            client: aws_sdk_ses::Client::new(&config),
        }
    }
}

#[async_trait::async_trait]
impl Mailer for SesMailer {
    async fn send_raw(&self, from: &str, to: &str, raw: Vec<u8>) -> Result<()> {
        let message = RawMessage::builder()
            .data(Blob::new(raw))
            .build()
            .context("failed to build SES raw message")?;

        let resp = self
            .client
            .send_raw_email()
            .source(from)
            .destinations(to)
            .raw_message(message)
            .send()
            .await
            .with_context(|| format!("SES SendRawEmail failed for '{to}'"))?;

        debug!(recipient = to, message_id = resp.message_id(), "SES accepted message");
        Ok(())
    }
}
