//! Mail provider abstraction
//!
//! The seam between the pipeline and the network. One production
//! implementation ([`crate::gmail::client::GmailClient`]); tests supply
//! in-memory doubles.

use async_trait::async_trait;

use crate::error::Result;
use crate::gmail::types::Message;
use crate::mail::types::OutboundEmail;

/// Capability set of a mail provider
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Verify connectivity; must succeed before resource-style queries
    async fn connect(&self) -> Result<()>;

    /// List messages matching `query` and fetch each in full.
    ///
    /// The returned order is the provider's listing order and is preserved
    /// through the pipeline.
    async fn list_and_fetch(&self, query: &str, max_results: u32) -> Result<Vec<Message>>;

    /// Fetch and decode the bytes of one attachment
    async fn fetch_attachment_bytes(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<Vec<u8>>;

    /// Send an email
    async fn send_email(&self, email: &OutboundEmail) -> Result<()>;
}
