//! OAuth authentication for the Gmail API
//!
//! The server is bootstrapped with a long-lived refresh token from the
//! environment; this module exchanges it for short-lived access tokens and
//! caches them until shortly before expiry.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::{gmail::TOKEN_URL, Config};
use crate::error::{AuthError, MailMcpError, Result};

/// Refresh tokens this many seconds before their reported expiry.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Token response from the OAuth token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// A cached access token with its expiry timestamp (Unix seconds)
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Option<i64>,
}

impl CachedToken {
    fn is_fresh(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expiry) => expiry - now > EXPIRY_SKEW_SECS,
            None => true,
        }
    }
}

/// OAuth authenticator backed by a refresh-token grant
pub struct Authenticator {
    config: Config,
    http_client: reqwest::Client,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl Authenticator {
    /// Create a new authenticator
    pub fn new(config: Config) -> Result<Self> {
        if config.refresh_token.is_empty() {
            return Err(MailMcpError::Auth(AuthError::MissingRefreshToken));
        }

        Ok(Self {
            config,
            http_client: reqwest::Client::new(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Get a valid access token, refreshing if necessary
    pub async fn get_access_token(&self) -> Result<String> {
        let now = unix_now();

        if let Some(ref cached) = *self.token.read().await {
            if cached.is_fresh(now) {
                return Ok(cached.access_token.clone());
            }
        }

        self.refresh_token().await
    }

    /// Exchange the refresh token for a new access token
    async fn refresh_token(&self) -> Result<String> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", self.config.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http_client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MailMcpError::Auth(AuthError::TokenRefreshFailed {
                message: text,
            }));
        }

        let token_response: TokenResponse = response.json().await?;

        let cached = CachedToken {
            access_token: token_response.access_token.clone(),
            expires_at: token_response.expires_in.map(|e| unix_now() + e),
        };
        *self.token.write().await = Some(cached);

        Ok(token_response.access_token)
    }
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
            platform: "gmail".to_string(),
        }
    }

    #[test]
    fn test_new_rejects_empty_refresh_token() {
        let mut config = test_config();
        config.refresh_token = String::new();
        assert!(Authenticator::new(config).is_err());
    }

    #[test]
    fn test_cached_token_freshness() {
        let token = CachedToken {
            access_token: "abc".to_string(),
            expires_at: Some(1_000),
        };
        assert!(token.is_fresh(0));
        assert!(!token.is_fresh(950));

        let no_expiry = CachedToken {
            access_token: "abc".to_string(),
            expires_at: None,
        };
        assert!(no_expiry.is_fresh(i64::MAX));
    }
}
