//! Output validation
//!
//! Advisory completeness checks for a [`FormattedRecord`]. Validation never
//! fails; callers decide what to do with the reported errors (current
//! policy: log and proceed).

use crate::mail::types::FormattedRecord;

/// Result of validating a formatted record
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// True iff no errors were recorded
    pub is_valid: bool,

    /// Human-readable descriptions of each violated check
    pub errors: Vec<String>,
}

/// Check a formatted record for required-field completeness
pub fn validate(record: &FormattedRecord) -> ValidationReport {
    let mut errors = Vec::new();

    if record.metadata.id.is_empty() {
        errors.push("Missing email ID".to_string());
    }
    if record.metadata.timestamp.is_empty() {
        errors.push("Missing timestamp".to_string());
    }
    if record.participants.from.is_empty() {
        errors.push("Missing sender information".to_string());
    }
    if record.participants.to.is_empty() {
        errors.push("Missing recipient information".to_string());
    }
    if record.content.subject.is_empty() {
        errors.push("Missing subject".to_string());
    }
    let text_missing = record.content.body_text.as_deref().map_or(true, str::is_empty);
    let html_missing = record.content.body_html.as_deref().map_or(true, str::is_empty);
    if text_missing && html_missing {
        errors.push("Missing email content".to_string());
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::types::{
        Participants, ProcessingMetadata, RecordContent, RecordMetadata,
    };

    fn complete_record() -> FormattedRecord {
        FormattedRecord {
            metadata: RecordMetadata {
                id: "m1".to_string(),
                thread_id: "t1".to_string(),
                timestamp: "2024-01-01T00:00:00+00:00".to_string(),
                labels: vec![],
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
        }
    }

    #[test]
    fn test_complete_record_is_valid() {
        let report = validate(&complete_record());
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_empty_recipients_flagged() {
        let mut record = complete_record();
        record.participants.to.clear();
        let report = validate(&record);
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("recipient")));
    }

    #[test]
    fn test_missing_body_flagged() {
        let mut record = complete_record();
        record.content.body_text = None;
        record.content.body_html = None;
        let report = validate(&record);
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("content")));
    }

    #[test]
    fn test_multiple_errors_accumulate() {
        let mut record = complete_record();
        record.metadata.id.clear();
        record.metadata.timestamp.clear();
        record.participants.from.clear();
        record.content.subject.clear();
        let report = validate(&record);
        assert_eq!(report.errors.len(), 4);
    }

    #[test]
    fn test_empty_string_bodies_count_as_missing() {
        let mut record = complete_record();
        record.content.body_text = Some(String::new());
        record.content.body_html = None;
        let report = validate(&record);
        assert!(report.errors.iter().any(|e| e.contains("content")));
    }

    #[test]
    fn test_html_only_body_passes() {
        let mut record = complete_record();
        record.content.body_text = None;
        record.content.body_html = Some("hello".to_string());
        assert!(validate(&record).is_valid);
    }
}
