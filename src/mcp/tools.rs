//! MCP Tool definitions and handlers
//!
//! Defines the email tools and their implementations over the mail
//! processor. Arguments are validated by typed deserialization: a type
//! mismatch is rejected, never coerced.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::mail::processor::MailProcessor;
use crate::mail::renderer::OutputFormat;
use crate::mcp::types::{CallToolResult, Tool};

/// Tool handler
pub struct ToolHandler {
    processor: Arc<MailProcessor>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(processor: Arc<MailProcessor>) -> Self {
        Self { processor }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        vec![
            tool_def(
                "email_reader",
                "Read specified number of emails with various filter conditions",
                email_reader_schema(),
            ),
            tool_def(
                "email_search",
                "Search emails using advanced search conditions",
                email_search_schema(),
            ),
            tool_def(
                "email_formatter",
                "Format email content with various output formats and cleaning options",
                email_formatter_schema(),
            ),
        ]
    }

    /// Call a tool by name
    pub async fn call_tool(&self, name: &str, args: Value) -> CallToolResult {
        match name {
            "email_reader" => self.handle_email_reader(args).await,
            "email_search" => self.handle_email_search(args).await,
            "email_formatter" => self.handle_email_formatter(args).await,
            _ => CallToolResult::error(format!("Unknown tool: {}", name)),
        }
    }

    // ==================== Tool Handlers ====================

    async fn handle_email_reader(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Args {
            query: Option<String>,
            max_results: Option<u32>,
            format: Option<String>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let format = match parse_format(args.format.as_deref()) {
            Ok(f) => f,
            Err(e) => return CallToolResult::error(e),
        };

        self.run_pipeline(args.query.as_deref(), args.max_results, format)
            .await
    }

    async fn handle_email_search(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Args {
            query: String,
            max_results: Option<u32>,
            #[allow(dead_code)] // accepted and type-checked; non-behavioral
            include_attachments: Option<bool>,
            format: Option<String>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let format = match parse_format(args.format.as_deref()) {
            Ok(f) => f,
            Err(e) => return CallToolResult::error(e),
        };

        self.run_pipeline(Some(&args.query), args.max_results, format)
            .await
    }

    async fn handle_email_formatter(&self, args: Value) -> CallToolResult {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        #[allow(dead_code)] // cleaning flags accepted and type-checked; non-behavioral
        struct Args {
            format: String,
            clean_html: Option<bool>,
            remove_urls: Option<bool>,
            remove_images: Option<bool>,
            max_length: Option<usize>,
        }

        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return CallToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let format = match parse_format(Some(&args.format)) {
            Ok(f) => f,
            Err(e) => return CallToolResult::error(e),
        };

        let records = match self.processor.process_emails(None, None).await {
            Ok(r) => r,
            Err(e) => return CallToolResult::error(e.to_string()),
        };

        match self.processor.rendered_output(&records, format) {
            Ok(output) => {
                // Hard truncation; not aware of encoding boundaries
                let output = match args.max_length {
                    Some(max) => output.chars().take(max).collect(),
                    None => output,
                };
                CallToolResult::text(output)
            }
            Err(e) => CallToolResult::error(e.to_string()),
        }
    }

    async fn run_pipeline(
        &self,
        query: Option<&str>,
        max_results: Option<u32>,
        format: OutputFormat,
    ) -> CallToolResult {
        let records = match self.processor.process_emails(query, max_results).await {
            Ok(r) => r,
            Err(e) => return CallToolResult::error(e.to_string()),
        };

        match self.processor.rendered_output(&records, format) {
            Ok(output) => CallToolResult::text(output),
            Err(e) => CallToolResult::error(e.to_string()),
        }
    }
}

fn parse_format(format: Option<&str>) -> std::result::Result<OutputFormat, String> {
    match format {
        Some(token) => token.parse().map_err(|e: crate::MailMcpError| e.to_string()),
        None => Ok(OutputFormat::default()),
    }
}

// ==================== Schema Definitions ====================

fn tool_def(name: &str, description: &str, input_schema: Value) -> Tool {
    Tool {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
    }
}

fn format_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["structured", "tabular", "summary", "json", "csv", "txt"],
        "description": "Output format"
    })
}

fn email_reader_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "maxResults": {
                "type": "number",
                "description": "Number of emails to read (default: 10)"
            },
            "query": {
                "type": "string",
                "description": "Gmail query syntax, e.g., 'is:unread', 'newer_than:2d'"
            },
            "format": format_schema()
        },
        "required": []
    })
}

fn email_search_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Gmail advanced search syntax"
            },
            "maxResults": {
                "type": "number",
                "description": "Maximum number of results"
            },
            "includeAttachments": {
                "type": "boolean",
                "description": "Include attachment information"
            },
            "format": format_schema()
        },
        "required": ["query"]
    })
}

fn email_formatter_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "format": format_schema(),
            "cleanHtml": {
                "type": "boolean",
                "description": "Clean HTML content"
            },
            "removeUrls": {
                "type": "boolean",
                "description": "Remove URLs"
            },
            "removeImages": {
                "type": "boolean",
                "description": "Remove image tags"
            },
            "maxLength": {
                "type": "number",
                "description": "Maximum content length"
            }
        },
        "required": ["format"]
    })
}
