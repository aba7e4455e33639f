//! MIME assembly for report emails.

use anyhow::{Context, Result, anyhow};
use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use std::path::Path;

use crate::report::Report;

/// A file attached to the report email.
#[derive(Debug, Clone)]
pub struct ReportAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ReportAttachment {
    /// Reads a PNG from disk, naming the attachment after the file.
    pub fn png(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("chart.png")
            .to_string();

        Ok(Self {
            filename,
            content_type: "image/png".to_string(),
            bytes,
        })
    }
}

/// Builds the raw RFC 5322 message for one recipient.
///
/// The body is `multipart/mixed`: a `multipart/alternative` with the text and
/// HTML versions, followed by the attachment if there is one.
pub fn build_message(
    from: &str,
    to: &str,
    report: &Report,
    attachment: Option<&ReportAttachment>,
) -> Result<Vec<u8>> {
    let from: Mailbox = from
        .parse()
        .with_context(|| format!("invalid sender address '{from}'"))?;
    let to: Mailbox = to
        .parse()
        .with_context(|| format!("invalid recipient address '{to}'"))?;

    let mut body = MultiPart::mixed().multipart(MultiPart::alternative_plain_html(
        report.text.clone(),
        report.html.clone(),
    ));

    if let Some(attachment) = attachment {
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|e| anyhow!("invalid content type '{}': {e}", attachment.content_type))?;
        body = body.singlepart(
            Attachment::new(attachment.filename.clone()).body(attachment.bytes.clone(), content_type),
        );
    }

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(report.subject.clone())
        .multipart(body)?;

    Ok(message.formatted())
}
