//! Record formatting
//!
//! Derives a presentation-ready [`FormattedRecord`] from a
//! [`NormalizedEmail`], sanitizing body content along the way.

use chrono::Utc;

use crate::error::Result;
use crate::mail::sanitizer::{sanitize_html, sanitize_plain_text};
use crate::mail::types::{
    AttachmentSummary, FormattedRecord, NormalizedEmail, Participants, ProcessingMetadata,
    RecordContent, RecordMetadata,
};

/// Version tag stamped into processing metadata
pub const FORMAT_VERSION: &str = "1.0.0";

/// Format a normalized email into a [`FormattedRecord`].
///
/// Bodies are sanitized only when present; an absent body stays absent
/// rather than becoming an empty string.
pub fn format(email: &NormalizedEmail, platform: &str) -> Result<FormattedRecord> {
    let body_text = email.content.text.as_deref().map(sanitize_plain_text);
    let body_html = email.content.html.as_deref().map(sanitize_html);

    Ok(FormattedRecord {
        metadata: RecordMetadata {
            id: email.id.clone(),
            thread_id: email.thread_id.clone(),
            timestamp: email.date.to_rfc3339(),
            labels: email.labels.clone(),
        },
        participants: Participants {
            from: email.from.clone(),
            to: email.to.clone(),
            cc: email.cc.clone(),
            bcc: email.bcc.clone(),
        },
        content: RecordContent {
            subject: email.subject.clone(),
            body_text,
            body_html,
            attachments: email
                .attachments
                .iter()
                .map(|a| AttachmentSummary {
                    name: a.filename.clone(),
                    content_type: a.content_type.clone(),
                    size: a.content.len(),
                })
                .collect(),
        },
        processing_metadata: ProcessingMetadata {
            platform: platform.to_string(),
            processing_time: Utc::now().to_rfc3339(),
            version: FORMAT_VERSION.to_string(),
        },
    })
}
