//! REST client for the chat backend's per-message update endpoint.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{MessageSync, SyncError};

#[derive(Debug, Serialize)]
struct UpdateMessageBody<'a> {
    content: &'a str,
}

pub struct SyncClient {
    pub base_url: String,
    client: reqwest::Client,
}

impl SyncClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Reuse an existing client (connection pool, proxy settings, ...).
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Ids are appended as encoded path segments, so `/`, `?` and `#` stay inside them.
    fn message_url(&self, chat_id: &str, message_id: &str) -> Result<reqwest::Url, SyncError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| SyncError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["chats", chat_id, "messages", message_id]);
        Ok(url)
    }
}

/// Parse a body that may be JSON, plain text, or empty.
fn lenient_json(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

#[async_trait]
impl MessageSync for SyncClient {
    async fn sync_message_edit(
        &self,
        token: &str,
        chat_id: &str,
        message_id: &str,
        content: &str,
    ) -> Result<serde_json::Value, SyncError> {
        let url = self.message_url(chat_id, message_id)?;
        debug!(%url, "Syncing message edit");

        let response = self
            .client
            .post(url)
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .json(&UpdateMessageBody { content })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = lenient_json(&text);
            warn!(status = status.as_u16(), %body, "Message update rejected");
            return Err(SyncError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_url_trims_trailing_slash() {
        let client = SyncClient::new("http://localhost:8080/api/v1/");
        assert_eq!(
            client.message_url("chat-1", "msg-2").unwrap().as_str(),
            "http://localhost:8080/api/v1/chats/chat-1/messages/msg-2"
        );
    }

    #[test]
    fn test_message_url_encodes_ids() {
        let client = SyncClient::new("http://localhost:8080/api/v1");
        let url = client.message_url("a/b", "c?d#e").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/chats/a%2Fb/messages/c%3Fd%23e"
        );
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_message_url_rejects_bad_base() {
        let client = SyncClient::new("not a url");
        assert!(matches!(
            client.message_url("chat-1", "msg-2"),
            Err(SyncError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_lenient_json() {
        assert_eq!(lenient_json(""), serde_json::Value::Null);
        assert_eq!(lenient_json(r#"{"detail":"nope"}"#)["detail"], "nope");
        assert_eq!(lenient_json("Bad Gateway"), serde_json::json!("Bad Gateway"));
    }

    #[test]
    fn test_body_shape() {
        let body = serde_json::to_value(UpdateMessageBody { content: "new" }).unwrap();
        assert_eq!(body, serde_json::json!({ "content": "new" }));
    }
}
