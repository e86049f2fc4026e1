//! Gmail API client
//!
//! The production [`MailProvider`] implementation, backed by the Gmail REST
//! API v1.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::gmail::{API_BASE_URL, USER_ID};
use crate::error::{MailMcpError, ProviderError, Result};
use crate::gmail::auth::Authenticator;
use crate::gmail::types::{AttachmentData, Message, MessageList, Profile, SendMessageRequest};
use crate::gmail::utils::{create_mime_message, decode_base64url, encode_raw_message};
use crate::mail::provider::MailProvider;
use crate::mail::types::OutboundEmail;

/// Gmail API client
pub struct GmailClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// OAuth authenticator
    authenticator: Arc<Authenticator>,
}

impl GmailClient {
    /// Create a new Gmail client
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            authenticator,
        }
    }

    /// Get a valid access token
    async fn access_token(&self) -> Result<String> {
        self.authenticator.get_access_token().await
    }

    /// Base URL for messages
    fn messages_url() -> String {
        format!("{}/users/{}/messages", API_BASE_URL, USER_ID)
    }

    /// Fetch one message in full form
    async fn get_message(&self, token: &str, message_id: &str) -> Result<Message> {
        let url = format!("{}/{}?format=full", Self::messages_url(), message_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else if response.status().as_u16() == 404 {
            Err(MailMcpError::Provider(ProviderError::MessageNotFound {
                message_id: message_id.to_string(),
            }))
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(MailMcpError::Provider(ProviderError::RequestFailed {
                message: format!("Failed to get message ({}): {}", status, text),
            }))
        }
    }
}

#[async_trait]
impl MailProvider for GmailClient {
    /// Verify connectivity by fetching the user profile
    async fn connect(&self) -> Result<()> {
        let token = self.access_token().await?;
        let url = format!("{}/users/{}/profile", API_BASE_URL, USER_ID);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| {
                MailMcpError::Provider(ProviderError::Connection {
                    message: e.to_string(),
                })
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(MailMcpError::Provider(ProviderError::Connection {
                message: format!("profile request failed ({}): {}", status, text),
            }));
        }

        let profile: Profile = response.json().await?;
        tracing::debug!("Connected to Gmail as {}", profile.email_address);

        Ok(())
    }

    /// List matching messages and fetch each in full, preserving listing order
    async fn list_and_fetch(&self, query: &str, max_results: u32) -> Result<Vec<Message>> {
        let token = self.access_token().await?;

        let url = format!(
            "{}?q={}&maxResults={}",
            Self::messages_url(),
            urlencoding::encode(query),
            max_results
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(MailMcpError::Provider(ProviderError::Fetch {
                message: format!("Failed to list messages ({}): {}", status, text),
            }));
        }

        let message_list: MessageList = response.json().await?;

        let mut messages = Vec::with_capacity(message_list.messages.len());
        for msg_ref in message_list.messages {
            messages.push(self.get_message(&token, &msg_ref.id).await?);
        }

        Ok(messages)
    }

    /// Fetch and decode one attachment's bytes
    async fn fetch_attachment_bytes(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Vec<u8>> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/{}/attachments/{}",
            Self::messages_url(),
            message_id,
            attachment_id
        );

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await?;

        if response.status().as_u16() == 404 {
            return Err(MailMcpError::Provider(ProviderError::AttachmentNotFound {
                attachment_id: attachment_id.to_string(),
            }));
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(MailMcpError::Provider(ProviderError::RequestFailed {
                message: format!("Failed to get attachment ({}): {}", status, text),
            }));
        }

        let attachment: AttachmentData = response.json().await?;
        let data = attachment.data.ok_or_else(|| {
            MailMcpError::Provider(ProviderError::AttachmentNotFound {
                attachment_id: attachment_id.to_string(),
            })
        })?;

        decode_base64url(&data)
    }

    /// Send an email
    async fn send_email(&self, email: &OutboundEmail) -> Result<()> {
        let token = self.access_token().await?;

        let raw_message = create_mime_message(email)?;
        let request = SendMessageRequest {
            raw: encode_raw_message(&raw_message),
        };

        let url = format!("{}/send", Self::messages_url());

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(MailMcpError::Provider(ProviderError::SendFailed {
                message: format!("send request failed ({}): {}", status, text),
            }))
        }
    }
}
