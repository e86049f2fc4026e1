//! Error types for the Mail MCP Server
//!
//! This module defines the error hierarchy for all operations in the server.

use thiserror::Error;

/// Main error type for the Mail MCP Server
#[derive(Error, Debug)]
pub enum MailMcpError {
    /// OAuth authentication errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Mail provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Normalization/formatting pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// OAuth authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No refresh token configured")]
    MissingRefreshToken,

    #[error("Failed to refresh access token: {message}")]
    TokenRefreshFailed { message: String },
}

/// Errors from the mail provider (network-facing)
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to connect to mail provider: {message}")]
    Connection { message: String },

    #[error("Failed to fetch messages: {message}")]
    Fetch { message: String },

    #[error("Message not found: {message_id}")]
    MessageNotFound { message_id: String },

    #[error("Attachment not found: {attachment_id}")]
    AttachmentNotFound { attachment_id: String },

    #[error("API request failed: {message}")]
    RequestFailed { message: String },

    #[error("Failed to send email: {message}")]
    SendFailed { message: String },
}

/// Errors from the normalization/formatting pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Raw message is missing its id, thread id, or payload
    #[error("Malformed message: {reason}")]
    MalformedMessage { reason: String },

    /// One attachment could not be fetched; callers skip it, not the message
    #[error("Failed to fetch attachment '{filename}': {message}")]
    AttachmentFetch { filename: String, message: String },

    /// Unexpected internal failure while building or serializing a record
    #[error("Failed to format email: {message}")]
    Formatting { message: String },

    #[error("Unsupported output format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid base64 data: {message}")]
    InvalidBase64 { message: String },

    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// MCP protocol errors
#[derive(Error, Debug)]
#[allow(dead_code)] // Some variants reserved for future use
pub enum McpError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Invalid tool arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Resource not found: {uri}")]
    ResourceNotFound { uri: String },

    #[error("Protocol error: {message}")]
    ProtocolError { message: String },
}

/// Result type alias for Mail MCP operations
pub type Result<T> = std::result::Result<T, MailMcpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::MalformedMessage {
            reason: "missing payload".to_string(),
        };
        assert!(err.to_string().contains("missing payload"));
    }

    #[test]
    fn test_error_conversion() {
        let pipeline_err = PipelineError::UnsupportedFormat {
            format: "xml".to_string(),
        };
        let err: MailMcpError = pipeline_err.into();
        assert!(matches!(err, MailMcpError::Pipeline(_)));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar {
            var: "GMAIL_CLIENT_ID".to_string(),
        };
        assert!(err.to_string().contains("GMAIL_CLIENT_ID"));
    }
}
