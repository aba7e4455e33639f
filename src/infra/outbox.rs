use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

use crate::services::mailer::Mailer;

/// Writes messages to `.eml` files instead of sending them.
pub struct FileMailer {
    dir: PathBuf,
}

impl FileMailer {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, to: &str) -> PathBuf {
        let recipient: String = to
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '@' || c == '.' { c } else { '_' })
            .collect();
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6f");
        self.dir.join(format!("{recipient}_{stamp}.eml"))
    }
}

#[async_trait::async_trait]
impl Mailer for FileMailer {
    async fn send_raw(&self, _from: &str, to: &str, raw: Vec<u8>) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(to);
        std::fs::write(&path, raw).with_context(|| format!("failed to write {}", path.display()))?;
        info!(recipient = to, path = %path.display(), "Message written to outbox");
        Ok(())
    }
}
