//! MCP resource definitions and handler
//!
//! Three static resource descriptors over the mail pipeline, each resolved
//! through the assistant renderer.

use std::sync::Arc;

use crate::error::{MailMcpError, McpError, Result};
use crate::mail::processor::MailProcessor;
use crate::mcp::types::{ReadResourceResult, Resource, ResourceContent};

/// Get all resource definitions
pub fn resource_definitions() -> Vec<Resource> {
    vec![
        Resource {
            uri: "mail://recent".to_string(),
            name: "Recent Emails".to_string(),
            description: Some("Recent emails (default 10)".to_string()),
            mime_type: Some("application/json".to_string()),
        },
        Resource {
            uri: "mail://unread".to_string(),
            name: "Unread Emails".to_string(),
            description: Some("Unread emails".to_string()),
            mime_type: Some("application/json".to_string()),
        },
        Resource {
            uri: "mail://important".to_string(),
            name: "Important Emails".to_string(),
            description: Some("Important emails".to_string()),
            mime_type: Some("application/json".to_string()),
        },
    ]
}

/// Map a resource URI to its provider query
fn query_for_uri(uri: &str) -> Option<&'static str> {
    match uri {
        "mail://recent" => Some("newer_than:2d"),
        "mail://unread" => Some("is:unread"),
        "mail://important" => Some("is:important"),
        _ => None,
    }
}

/// Resource handler
pub struct ResourceHandler {
    processor: Arc<MailProcessor>,
}

impl ResourceHandler {
    /// Create a new resource handler
    pub fn new(processor: Arc<MailProcessor>) -> Self {
        Self { processor }
    }

    /// List the static resource descriptors, verifying provider
    /// connectivity first
    pub async fn list(&self) -> Result<Vec<Resource>> {
        self.processor.initialize().await?;
        Ok(resource_definitions())
    }

    /// Read a resource through the pipeline and the assistant renderer
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult> {
        let query = query_for_uri(uri).ok_or_else(|| {
            MailMcpError::Mcp(McpError::ResourceNotFound {
                uri: uri.to_string(),
            })
        })?;

        self.processor.initialize().await?;

        let records = self.processor.process_emails(Some(query), Some(10)).await?;
        let text = self.processor.assistant_output(&records)?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContent {
                uri: uri.to_string(),
                text: Some(text),
                mime_type: Some("application/json".to_string()),
            }],
        })
    }
}
