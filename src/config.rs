//! Configuration management for the Mail MCP Server
//!
//! Loads OAuth credentials from environment variables and holds the Gmail
//! API constants.

use crate::error::{ConfigError, MailMcpError, Result};

/// Default platform tag stamped into processing metadata
pub const DEFAULT_PLATFORM: &str = "gmail";

/// Configuration for the Mail MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Long-lived OAuth refresh token
    pub refresh_token: String,

    /// Platform tag for processing metadata
    pub platform: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `GMAIL_CLIENT_ID`, `GMAIL_CLIENT_SECRET` and `GMAIL_REFRESH_TOKEN`
    /// are required; a missing one is fatal at startup.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: require_env("GMAIL_CLIENT_ID")?,
            client_secret: require_env("GMAIL_CLIENT_SECRET")?,
            refresh_token: require_env("GMAIL_REFRESH_TOKEN")?,
            platform: std::env::var("MAIL_PLATFORM")
                .unwrap_or_else(|_| DEFAULT_PLATFORM.to_string()),
        })
    }
}

fn require_env(var: &str) -> Result<String> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            MailMcpError::Config(ConfigError::MissingEnvVar {
                var: var.to_string(),
            })
        })
}

/// Gmail API constants
pub mod gmail {
    /// Base URL for Gmail API
    pub const API_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

    /// OAuth token endpoint
    pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

    /// User ID for the authenticated user
    pub const USER_ID: &str = "me";
}
