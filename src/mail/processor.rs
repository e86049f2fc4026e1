//! Pipeline orchestration
//!
//! Runs fetched messages through normalize → format → validate in listing
//! order and hands the resulting records to the renderer.

use std::sync::Arc;

use crate::error::Result;
use crate::mail::formatter;
use crate::mail::normalizer;
use crate::mail::provider::MailProvider;
use crate::mail::renderer::{self, OutputFormat};
use crate::mail::types::FormattedRecord;
use crate::mail::validator;

/// Default number of messages fetched per request
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Orchestrates the fetch → normalize → format → validate pipeline
pub struct MailProcessor {
    provider: Arc<dyn MailProvider>,
    platform: String,
}

impl MailProcessor {
    /// Create a new processor over a provider
    pub fn new(provider: Arc<dyn MailProvider>, platform: impl Into<String>) -> Self {
        Self {
            provider,
            platform: platform.into(),
        }
    }

    /// Verify provider connectivity; must succeed before resource queries
    pub async fn initialize(&self) -> Result<()> {
        self.provider.connect().await
    }

    /// Fetch, normalize, format, and validate messages in listing order.
    ///
    /// Validation findings are non-fatal and surface as warnings;
    /// normalization and formatting errors propagate and abort the whole
    /// call.
    pub async fn process_emails(
        &self,
        query: Option<&str>,
        max_results: Option<u32>,
    ) -> Result<Vec<FormattedRecord>> {
        let messages = self
            .provider
            .list_and_fetch(
                query.unwrap_or(""),
                max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            )
            .await?;

        let mut records = Vec::with_capacity(messages.len());
        for message in &messages {
            let email = normalizer::normalize(self.provider.as_ref(), message).await?;
            let record = formatter::format(&email, &self.platform)?;

            let report = validator::validate(&record);
            if !report.is_valid {
                tracing::warn!(
                    "Validation warnings for email {}: {}",
                    record.metadata.id,
                    report.errors.join("; ")
                );
            }

            records.push(record);
        }

        Ok(records)
    }

    /// Render records into the chosen output format
    pub fn rendered_output(
        &self,
        records: &[FormattedRecord],
        format: OutputFormat,
    ) -> Result<String> {
        renderer::render_all(records, format)
    }

    /// Render each record through the assistant trim and join with a blank
    /// line
    pub fn assistant_output(&self, records: &[FormattedRecord]) -> Result<String> {
        let rendered: Result<Vec<String>> = records
            .iter()
            .map(renderer::render_for_assistant)
            .collect();
        Ok(rendered?.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    use crate::error::{MailMcpError, ProviderError};
    use crate::gmail::types::{Header, Message, MessagePart, MessagePartBody};
    use crate::mail::types::OutboundEmail;

    struct FixedProvider {
        messages: Vec<Message>,
    }

    #[async_trait]
    impl MailProvider for FixedProvider {
        async fn connect(&self) -> Result<()> {
            Ok(())
        }

        async fn list_and_fetch(&self, _query: &str, max_results: u32) -> Result<Vec<Message>> {
            Ok(self
                .messages
                .iter()
                .take(max_results as usize)
                .cloned()
                .collect())
        }

        async fn fetch_attachment_bytes(
            &self,
            _message_id: &str,
            attachment_id: &str,
        ) -> Result<Vec<u8>> {
            Err(MailMcpError::Provider(ProviderError::AttachmentNotFound {
                attachment_id: attachment_id.to_string(),
            }))
        }

        async fn send_email(&self, _email: &OutboundEmail) -> Result<()> {
            Ok(())
        }
    }

    fn message(id: &str, subject: &str) -> Message {
        Message {
            id: Some(id.to_string()),
            thread_id: Some(format!("thread-{}", id)),
            label_ids: vec!["INBOX".to_string()],
            payload: Some(MessagePart {
                headers: vec![
                    Header {
                        name: "Subject".to_string(),
                        value: subject.to_string(),
                    },
                    Header {
                        name: "From".to_string(),
                        value: "a@x.com".to_string(),
                    },
                    Header {
                        name: "To".to_string(),
                        value: "b@x.com".to_string(),
                    },
                ],
                parts: vec![MessagePart {
                    mime_type: Some("text/plain".to_string()),
                    body: Some(MessagePartBody {
                        data: Some(URL_SAFE_NO_PAD.encode("body text")),
                        size: 9,
                        ..Default::default()
                    }),
                    ..Default::default()
                }],
                ..Default::default()
            }),
            internal_date: Some("1700000000000".to_string()),
            ..Default::default()
        }
    }

    fn processor(messages: Vec<Message>) -> MailProcessor {
        MailProcessor::new(Arc::new(FixedProvider { messages }), "gmail")
    }

    #[tokio::test]
    async fn test_process_emails_preserves_order() {
        let processor = processor(vec![message("m1", "first"), message("m2", "second")]);
        let records = processor.process_emails(None, None).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].metadata.id, "m1");
        assert_eq!(records[1].metadata.id, "m2");
        assert_eq!(records[0].content.subject, "first");
    }

    #[tokio::test]
    async fn test_process_emails_respects_max_results() {
        let processor = processor(vec![message("m1", "a"), message("m2", "b")]);
        let records = processor.process_emails(None, Some(1)).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_message_aborts_batch() {
        let mut bad = message("m2", "broken");
        bad.payload = None;
        let processor = processor(vec![message("m1", "ok"), bad]);

        assert!(processor.process_emails(None, None).await.is_err());
    }

    #[tokio::test]
    async fn test_assistant_output_joins_with_blank_line() {
        let processor = processor(vec![message("m1", "a"), message("m2", "b")]);
        let records = processor.process_emails(None, None).await.unwrap();
        let output = processor.assistant_output(&records).unwrap();

        let chunks: Vec<&str> = output.split("\n\n").collect();
        assert!(chunks.len() >= 2);
        assert!(output.contains("\"id\": \"m1\""));
        assert!(output.contains("\"id\": \"m2\""));
    }

    #[tokio::test]
    async fn test_rendered_output_structured_collection() {
        let processor = processor(vec![message("m1", "a")]);
        let records = processor.process_emails(None, None).await.unwrap();
        let output = processor
            .rendered_output(&records, OutputFormat::Structured)
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.is_array());
    }
}
