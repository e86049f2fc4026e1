//! Message normalization
//!
//! Converts a provider-native message (nested multipart tree, raw headers,
//! base64 bodies) into a canonical [`NormalizedEmail`].

use chrono::{DateTime, Utc};

use crate::error::{MailMcpError, PipelineError, Result};
use crate::gmail::types::{Message, MessagePart};
use crate::gmail::utils::{decode_base64url_string, find_header};
use crate::mail::provider::MailProvider;
use crate::mail::types::{Attachment, EmailBody, NormalizedEmail};

/// Normalize a raw provider message.
///
/// Fails with a malformed-message error when the raw message lacks an
/// identifier, thread identifier, or payload. A fetch failure for a single
/// attachment is logged and skipped; it does not fail the message.
pub async fn normalize(provider: &dyn MailProvider, raw: &Message) -> Result<NormalizedEmail> {
    let id = require(raw.id.as_deref(), "id")?;
    let thread_id = require(raw.thread_id.as_deref(), "thread id")?;
    let payload = raw.payload.as_ref().ok_or_else(|| malformed("payload"))?;

    let header = |name: &str| find_header(payload, name).unwrap_or("").to_string();

    let to: Vec<String> = header("to").split(',').map(|s| s.trim().to_string()).collect();
    let cc_header = header("cc");
    let cc: Vec<String> = if cc_header.is_empty() {
        Vec::new()
    } else {
        cc_header.split(',').map(|s| s.trim().to_string()).collect()
    };

    let mut content = EmailBody::default();
    let mut attachments = Vec::new();

    for part in flatten_parts(payload) {
        let filename = part.filename.as_deref().unwrap_or("");
        let attachment_id = part.body.as_ref().and_then(|b| b.attachment_id.as_deref());
        let inline_data = part.body.as_ref().and_then(|b| b.data.as_deref());
        let mime_type = part.mime_type.as_deref().unwrap_or("");

        if !filename.is_empty() {
            if let Some(attachment_id) = attachment_id {
                match provider.fetch_attachment_bytes(&id, attachment_id).await {
                    Ok(bytes) => attachments.push(Attachment {
                        filename: filename.to_string(),
                        content: bytes,
                        content_type: part
                            .mime_type
                            .clone()
                            .unwrap_or_else(|| "application/octet-stream".to_string()),
                    }),
                    Err(e) => {
                        let skipped = PipelineError::AttachmentFetch {
                            filename: filename.to_string(),
                            message: e.to_string(),
                        };
                        tracing::warn!("{}", skipped);
                    }
                }
                continue;
            }
        }

        if let Some(data) = inline_data {
            // Last matching part wins
            if mime_type == "text/plain" {
                match decode_base64url_string(data) {
                    Ok(text) => content.text = Some(text),
                    Err(e) => tracing::debug!("Failed to decode text/plain part: {}", e),
                }
            } else if mime_type == "text/html" {
                match decode_base64url_string(data) {
                    Ok(html) => content.html = Some(html),
                    Err(e) => tracing::debug!("Failed to decode text/html part: {}", e),
                }
            }
        }
    }

    let date = raw
        .internal_date
        .as_deref()
        .and_then(|millis| millis.parse::<i64>().ok())
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or(DateTime::UNIX_EPOCH);

    Ok(NormalizedEmail {
        id,
        thread_id,
        subject: header("subject"),
        from: header("from"),
        to,
        cc,
        bcc: Vec::new(),
        content,
        attachments,
        date,
        labels: raw.label_ids.clone(),
    })
}

/// Flatten the part tree depth-first, children before the node itself.
///
/// Uses an explicit worklist instead of recursion; each stack entry tracks
/// the next child to descend into.
fn flatten_parts(root: &MessagePart) -> Vec<&MessagePart> {
    let mut stack = vec![(root, 0usize)];
    let mut flat = Vec::new();

    while let Some((part, child_idx)) = stack.pop() {
        if child_idx < part.parts.len() {
            stack.push((part, child_idx + 1));
            stack.push((&part.parts[child_idx], 0));
        } else {
            flat.push(part);
        }
    }

    flat
}

fn require(value: Option<&str>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or_else(|| malformed(field))
}

fn malformed(field: &str) -> MailMcpError {
    MailMcpError::Pipeline(PipelineError::MalformedMessage {
        reason: format!("missing {}", field),
    })
}
