//! Trait for delivering composed report emails.

use anyhow::Result;

/// Delivers one raw RFC 5322 message to a single recipient.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send_raw(&self, from: &str, to: &str, raw: Vec<u8>) -> Result<()>;
}
