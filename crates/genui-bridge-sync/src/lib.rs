//! Remote sync for edited messages.
//!
//! The relay persists an edit through the [`MessageSync`] trait so hosts and
//! tests can swap the HTTP client for anything else.

use async_trait::async_trait;
use thiserror::Error;

pub mod client;

pub use client::SyncClient;

#[derive(Debug, Error)]
pub enum SyncError {
    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server rejected edit with status {status}: {body}")]
    Rejected { status: u16, body: serde_json::Value },

    /// The configured base URL cannot carry the message path.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// The success body was not JSON.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Persists edited message content for a conversation.
#[async_trait]
pub trait MessageSync: Send + Sync {
    /// Replace the stored content of `message_id` in `chat_id`.
    ///
    /// Returns the server's acknowledgement body.
    async fn sync_message_edit(
        &self,
        token: &str,
        chat_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<serde_json::Value, SyncError>;
}
