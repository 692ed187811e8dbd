//! Actions an embedded component can ask the host to perform.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::types::MessageRef;

/// Typed request from the embedded UI tree to the host conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BridgeAction {
    /// Post a new user turn. `display_message` is shown in the chat,
    /// `llm_message` is what the model receives.
    SendUserMessage {
        display_message: String,
        llm_message: String,
    },
    /// Replace the content of an existing message.
    UpdateMessage {
        message: MessageRef,
        updated_content: String,
    },
}

impl BridgeAction {
    /// Build a send action where either side may be overridden; the other
    /// side falls back to `message`.
    pub fn send_with_overrides(
        message: &str,
        display_message: Option<&str>,
        llm_message: Option<&str>,
    ) -> Self {
        let pick = |o: Option<&str>| {
            o.filter(|s| !s.is_empty())
                .unwrap_or(message)
                .to_string()
        };
        Self::SendUserMessage {
            display_message: pick(display_message),
            llm_message: pick(llm_message),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SendUserMessage { .. } => "send_user_message",
            Self::UpdateMessage { .. } => "update_message",
        }
    }
}

/// Sending half handed to embedded components.
pub type ActionSink = mpsc::UnboundedSender<BridgeAction>;

/// Receiving half consumed by the relay.
pub type ActionReceiver = mpsc::UnboundedReceiver<BridgeAction>;

pub fn action_channel() -> (ActionSink, ActionReceiver) {
    mpsc::unbounded_channel()
}
