//! Canonical record types for the email pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body content of an email; at least one variant is normally present
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailBody {
    /// Plain text body
    pub text: Option<String>,

    /// HTML body
    pub html: Option<String>,
}

/// An attachment with its fetched bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Filename
    pub filename: String,

    /// Raw content bytes
    pub content: Vec<u8>,

    /// MIME type
    pub content_type: String,
}

/// Canonical, provider-agnostic representation of one email.
///
/// Produced once per fetched message by the normalizer and immutable
/// thereafter.
#[derive(Debug, Clone)]
pub struct NormalizedEmail {
    /// Opaque provider identifier, unique per message
    pub id: String,

    /// Groups related messages
    pub thread_id: String,

    /// Raw subject header
    pub subject: String,

    /// Raw from header
    pub from: String,

    /// Recipients, split from the comma-joined header
    pub to: Vec<String>,

    /// CC recipients; empty when the header is absent
    pub cc: Vec<String>,

    /// Always empty; not retrievable from a received message
    pub bcc: Vec<String>,

    /// Body content
    pub content: EmailBody,

    /// Attachments with fetched bytes
    pub attachments: Vec<Attachment>,

    /// Message date from the provider's epoch-millis field
    pub date: DateTime<Utc>,

    /// Provider-assigned classification tags
    pub labels: Vec<String>,
}

/// An email to be sent through the provider
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub content: EmailBody,
    pub attachments: Vec<Attachment>,
}

/// Presentation-ready record derived from a [`NormalizedEmail`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedRecord {
    pub metadata: RecordMetadata,
    pub participants: Participants,
    pub content: RecordContent,
    pub processing_metadata: ProcessingMetadata,
}

/// Message identity and classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub id: String,

    pub thread_id: String,

    /// ISO-8601 message timestamp
    pub timestamp: String,

    pub labels: Vec<String>,
}

/// Sender and recipients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participants {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
}

/// Subject, sanitized bodies, and attachment summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordContent {
    pub subject: String,

    /// Sanitized plain-text body; absent when the source had none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,

    /// Sanitized HTML body; absent when the source had none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,

    pub attachments: Vec<AttachmentSummary>,
}

/// Attachment metadata without the bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentSummary {
    pub name: String,

    #[serde(rename = "type")]
    pub content_type: String,

    /// Byte count
    pub size: usize,
}

/// Where and when the record was produced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingMetadata {
    pub platform: String,

    /// ISO-8601 formatting time (not the message time)
    pub processing_time: String,

    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_record_serializes_camel_case() {
        let record = FormattedRecord {
            metadata: RecordMetadata {
                id: "m1".to_string(),
                thread_id: "t1".to_string(),
                timestamp: "2024-01-01T00:00:00+00:00".to_string(),
                labels: vec!["INBOX".to_string()],
            },
            participants: Participants {
                from: "a@x.com".to_string(),
                to: vec!["b@x.com".to_string()],
                cc: vec![],
                bcc: vec![],
            },
            content: RecordContent {
                subject: "Hello".to_string(),
                body_text: Some("Hi".to_string()),
                body_html: None,
                attachments: vec![],
            },
            processing_metadata: ProcessingMetadata {
                platform: "gmail".to_string(),
                processing_time: "2024-01-01T00:00:01+00:00".to_string(),
                version: "1.0.0".to_string(),
            },
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["metadata"]["threadId"], "t1");
        assert_eq!(json["content"]["bodyText"], "Hi");
        assert!(json["content"].get("bodyHtml").is_none());
        assert_eq!(json["processingMetadata"]["version"], "1.0.0");
    }

    #[test]
    fn test_attachment_summary_type_field() {
        let summary = AttachmentSummary {
            name: "a.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size: 3,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "application/pdf");
        assert_eq!(json["size"], 3);
    }
}
