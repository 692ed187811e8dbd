//! The relay itself: applies actions to the shared history.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use genui_bridge_core::config::BridgeConfig;
use genui_bridge_core::{
    ActionReceiver, BridgeAction, ConversationTree, MessageRef, Role, SharedHistory,
    append_user_message,
};
use genui_bridge_sync::MessageSync;

use crate::{ChatMessage, SendPathway, SendRequest};

/// Capacity of the `history-updated` broadcast channel.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Fired after a local edit so observers can re-render.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryUpdated {
    pub message_id: String,
    pub history: ConversationTree,
}

/// Session values the relay needs from the host.
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    /// Remote sync is skipped unless both `chat_id` and `token` are non-empty.
    pub chat_id: Option<String>,
    pub token: Option<String>,
    /// Model ids stamped on appended user messages.
    pub models: Vec<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl RelayConfig {
    pub fn from_bridge_config(config: &BridgeConfig) -> Self {
        Self {
            chat_id: config.chat_id().map(String::from),
            token: config.token(),
            models: config.models.clone(),
        }
    }
}

/// What happened to a remote sync attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No chat id, token, or sync handle.
    Skipped,
    Synced,
    /// The local edit stays in place.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Empty id or content.
    Ignored,
    /// No message with that id.
    Unknown,
    Applied { sync: SyncStatus },
}

pub struct EventRelay {
    history: SharedHistory,
    sender: Arc<dyn SendPathway>,
    sync: Option<Arc<dyn MessageSync>>,
    config: RelayConfig,
    updates: broadcast::Sender<HistoryUpdated>,
}

impl EventRelay {
    pub fn new(
        config: RelayConfig,
        history: SharedHistory,
        sender: Arc<dyn SendPathway>,
        sync: Option<Arc<dyn MessageSync>>,
    ) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            history,
            sender,
            sync,
            config,
            updates,
        }
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    /// Subscribe to `history-updated` notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryUpdated> {
        self.updates.subscribe()
    }

    /// Apply one action. Failures are logged, never returned.
    pub async fn handle(&self, action: BridgeAction) {
        debug!(kind = action.kind(), "Relaying action");
        match action {
            BridgeAction::SendUserMessage {
                display_message,
                llm_message,
            } => {
                if let Err(e) = self.send_user_message(&display_message, &llm_message).await {
                    error!(error = %e, "Failed to relay user message");
                }
            }
            BridgeAction::UpdateMessage {
                message,
                updated_content,
            } => {
                self.update_message(&message, &updated_content).await;
            }
        }
    }

    /// Append a visible user turn and send the model-facing variant.
    ///
    /// Returns the new message id, or `None` when either text is empty.
    pub async fn send_user_message(
        &self,
        display_message: &str,
        llm_message: &str,
    ) -> anyhow::Result<Option<String>> {
        if display_message.is_empty() || llm_message.is_empty() {
            debug!("Ignoring send-user-message with empty payload");
            return Ok(None);
        }

        let message_id = {
            let mut tree = self.history.write().await;
            append_user_message(&mut tree, display_message, &self.config.models)
        };

        // Let history observers see the new turn before anything goes out.
        tokio::task::yield_now().await;

        let request = {
            let tree = self.history.read().await;
            let path = tree.path_to(&message_id);
            let prior = path.len().saturating_sub(1);
            let mut messages: Vec<ChatMessage> = path[..prior]
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect();
            messages.push(ChatMessage {
                role: Role::User,
                content: llm_message.to_string(),
            });
            SendRequest { messages }
        };

        info!(message_id = %message_id, history_len = request.messages.len(), "Sending user message");
        self.sender
            .send_message(&self.history, &message_id, request)
            .await?;

        Ok(Some(message_id))
    }

    /// Edit a message locally, notify observers, then try to persist the edit.
    pub async fn update_message(&self, message: &MessageRef, updated_content: &str) -> UpdateOutcome {
        let message_id = message.message_id.as_str();
        if message_id.is_empty() || updated_content.is_empty() {
            debug!(%message, "Ignoring update-message with empty payload");
            return UpdateOutcome::Ignored;
        }

        let snapshot = {
            let mut tree = self.history.write().await;
            let Some(target) = tree.get_mut(message_id) else {
                debug!(message_id, "Ignoring update for unknown message");
                return UpdateOutcome::Unknown;
            };
            target.apply_edit(updated_content);
            tree.clone()
        };

        info!(message_id, "Applied message edit");
        // No subscribers is fine.
        let _ = self.updates.send(HistoryUpdated {
            message_id: message_id.to_string(),
            history: snapshot,
        });

        tokio::task::yield_now().await;

        let sync = self.sync_edit(message_id, updated_content).await;
        UpdateOutcome::Applied { sync }
    }

    async fn sync_edit(&self, message_id: &str, content: &str) -> SyncStatus {
        let (Some(chat_id), Some(token), Some(sync)) = (
            non_empty(&self.config.chat_id),
            non_empty(&self.config.token),
            &self.sync,
        ) else {
            debug!(message_id, "Remote sync skipped");
            return SyncStatus::Skipped;
        };

        match sync.sync_message_edit(token, chat_id, message_id, content).await {
            Ok(_) => {
                info!(message_id, chat_id = %chat_id, "Message edit synced");
                SyncStatus::Synced
            }
            Err(e) => {
                warn!(message_id, error = %e, "Message edit not synced; keeping local content");
                SyncStatus::Failed(e.to_string())
            }
        }
    }

    /// Consume actions from `actions` until detached or the sink side closes.
    ///
    /// Actions run one at a time, in arrival order. An action that has
    /// started always runs to completion.
    pub fn attach(self: Arc<Self>, mut actions: ActionReceiver) -> RelayHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            loop {
                let action = tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    next = actions.recv() => match next {
                        Some(action) => action,
                        None => break,
                    },
                };
                self.handle(action).await;
            }
            debug!("Relay detached");
        });

        RelayHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }
}

/// Handle to an attached relay. Dropping it detaches the relay too.
pub struct RelayHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl RelayHandle {
    pub fn is_attached(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop consuming actions and wait for the in-flight one to finish.
    pub async fn detach(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            error!(error = %e, "Relay task ended abnormally");
        }
    }
}

impl Drop for RelayHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
