//! Action relay between an embedded UI tree and the host conversation.
//!
//! The [`EventRelay`] receives [`BridgeAction`]s from embedded components,
//! applies them to the shared history, forwards new turns to the host's
//! [`SendPathway`], and persists edits through a [`MessageSync`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use genui_bridge_core::{Role, SharedHistory};

pub mod relay;
pub mod signal;

pub use genui_bridge_core::BridgeAction;
pub use genui_bridge_sync::MessageSync;
pub use relay::{EventRelay, HistoryUpdated, RelayConfig, RelayHandle, SyncStatus, UpdateOutcome};
pub use signal::InboundSignal;

/// One entry of the message list handed to the host's send pathway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Payload for [`SendPathway::send_message`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub messages: Vec<ChatMessage>,
}

/// The host's own message-send entry point.
#[async_trait]
pub trait SendPathway: Send + Sync {
    /// Send the turn ending at `message_id` to the model.
    ///
    /// `request.messages` is what the backend sees; it may differ from the
    /// visible history in its last entry.
    async fn send_message(
        &self,
        history: &SharedHistory,
        message_id: &str,
        request: SendRequest,
    ) -> anyhow::Result<()>;
}
