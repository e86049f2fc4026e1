//! Output rendering
//!
//! Serializes formatted records into one of several encodings: the full
//! structured form, a single-line tabular form, a human-readable summary,
//! or the trimmed form delivered to LLM-facing resource reads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{MailMcpError, PipelineError, Result};
use crate::mail::types::{AttachmentSummary, FormattedRecord, ProcessingMetadata};

/// Header line for the tabular encoding
const TABULAR_HEADER: &str = "ID,Timestamp,From,To,Subject,Content,Attachments,Labels";

/// Render format for a formatted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Full structured serialization (alias: `json`)
    #[default]
    Structured,

    /// Single-line comma-separated row per record (alias: `csv`)
    Tabular,

    /// Human-readable summary block (alias: `txt`)
    Summary,
}

impl FromStr for OutputFormat {
    type Err = MailMcpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(OutputFormat::Structured),
            "tabular" | "csv" => Ok(OutputFormat::Tabular),
            "summary" | "txt" => Ok(OutputFormat::Summary),
            _ => Err(MailMcpError::Pipeline(PipelineError::UnsupportedFormat {
                format: s.to_string(),
            })),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Structured => write!(f, "structured"),
            OutputFormat::Tabular => write!(f, "tabular"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// Render a single record into the chosen format
pub fn render(record: &FormattedRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Structured => to_json(record),
        OutputFormat::Tabular => Ok(to_tabular(record)),
        OutputFormat::Summary => Ok(to_summary(record)),
    }
}

/// Render a collection of records into the chosen format.
///
/// The structured form serializes the whole collection as one array; the
/// other forms render each record independently (the tabular form includes
/// its own header per record) and concatenate with a blank line.
pub fn render_all(records: &[FormattedRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Structured => to_json(&records),
        _ => {
            let rendered: Result<Vec<String>> =
                records.iter().map(|r| render(r, format)).collect();
            Ok(rendered?.join("\n\n"))
        }
    }
}

/// Render the trimmed, LLM-facing form of a record.
///
/// When a plain-text body is present the HTML body is dropped entirely; the
/// timestamp becomes a display string; empty cc/bcc/attachments are omitted.
pub fn render_for_assistant(record: &FormattedRecord) -> Result<String> {
    to_json(&AssistantRecord::from(record))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        MailMcpError::Pipeline(PipelineError::Formatting {
            message: e.to_string(),
        })
    })
}

fn to_tabular(record: &FormattedRecord) -> String {
    let body = record
        .content
        .body_text
        .as_deref()
        .unwrap_or("")
        .replace(['\n', '\r', ','], " ");

    let attachment_names: Vec<&str> = record
        .content
        .attachments
        .iter()
        .map(|a| a.name.as_str())
        .collect();

    let fields = [
        record.metadata.id.clone(),
        record.metadata.timestamp.clone(),
        record.participants.from.clone(),
        record.participants.to.join(";"),
        record.content.subject.clone(),
        body,
        attachment_names.join(";"),
        record.metadata.labels.join(";"),
    ];

    let row = fields
        .iter()
        .map(|field| format!("\"{}\"", field))
        .collect::<Vec<_>>()
        .join(",");

    format!("{}\n{}", TABULAR_HEADER, row)
}

fn to_summary(record: &FormattedRecord) -> String {
    let attachments = if record.content.attachments.is_empty() {
        "None".to_string()
    } else {
        record
            .content
            .attachments
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let labels = if record.metadata.labels.is_empty() {
        "None".to_string()
    } else {
        record.metadata.labels.join(", ")
    };

    let mut lines = vec![
        "Email Summary:".to_string(),
        "-------------".to_string(),
        format!("Date: {}", display_timestamp(&record.metadata.timestamp)),
        format!("From: {}", record.participants.from),
        format!("To: {}", record.participants.to.join(", ")),
    ];

    if !record.participants.cc.is_empty() {
        lines.push(format!("CC: {}", record.participants.cc.join(", ")));
    }

    lines.push(format!("Subject: {}", record.content.subject));
    lines.push(String::new());
    lines.push(format!("Attachments: {}", attachments));
    lines.push(String::new());
    lines.push(format!("Labels: {}", labels));

    lines.join("\n")
}

/// Reformat an RFC 3339 timestamp for display; unparseable values pass
/// through unchanged.
fn display_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Trimmed view of a record for LLM consumption
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssistantRecord {
    metadata: AssistantMetadata,
    participants: AssistantParticipants,
    content: AssistantContent,
    processing_metadata: ProcessingMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssistantMetadata {
    id: String,
    thread_id: String,
    timestamp: String,
    labels: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssistantParticipants {
    from: String,
    to: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    cc: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    bcc: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssistantContent {
    subject: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    body_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    body_html: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<AttachmentSummary>,
}

impl From<&FormattedRecord> for AssistantRecord {
    fn from(record: &FormattedRecord) -> Self {
        // Plain text takes precedence over the HTML body
        let body_html = if record.content.body_text.is_some() {
            None
        } else {
            record.content.body_html.clone()
        };

        Self {
            metadata: AssistantMetadata {
                id: record.metadata.id.clone(),
                thread_id: record.metadata.thread_id.clone(),
                timestamp: display_timestamp(&record.metadata.timestamp),
                labels: record.metadata.labels.clone(),
            },
            participants: AssistantParticipants {
                from: record.participants.from.clone(),
                to: record.participants.to.clone(),
                cc: record.participants.cc.clone(),
                bcc: record.participants.bcc.clone(),
            },
            content: AssistantContent {
                subject: record.content.subject.clone(),
                body_text: record.content.body_text.clone(),
                body_html,
                attachments: record.content.attachments.clone(),
            },
            processing_metadata: record.processing_metadata.clone(),
        }
    }
}
