//! Callback handles given to the embedded component.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use genui_bridge_core::{ActionSink, BridgeAction, MessageRef};

use crate::props::ActionParams;

/// Extra host observers, run after the action has been dispatched.
#[derive(Clone, Default)]
pub struct HostHooks {
    pub on_action: Option<Arc<dyn Fn(&ActionParams) + Send + Sync>>,
    pub on_update_message: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl fmt::Debug for HostHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostHooks")
            .field("on_action", &self.on_action.is_some())
            .field("on_update_message", &self.on_update_message.is_some())
            .finish()
    }
}

/// Typed entry points the foreign component calls back into.
#[derive(Debug, Clone)]
pub struct GenUiCallbacks {
    sink: ActionSink,
    message: Option<MessageRef>,
    hooks: HostHooks,
}

impl GenUiCallbacks {
    pub fn new(sink: ActionSink, message: Option<MessageRef>, hooks: HostHooks) -> Self {
        Self {
            sink,
            message,
            hooks,
        }
    }

    pub fn message(&self) -> Option<&MessageRef> {
        self.message.as_ref()
    }

    /// The component wants to post a user turn.
    pub fn on_action(&self, params: ActionParams) {
        if !params.llm_friendly_message.is_empty() && !params.human_friendly_message.is_empty() {
            self.dispatch(BridgeAction::SendUserMessage {
                display_message: params.human_friendly_message.clone(),
                llm_message: params.llm_friendly_message.clone(),
            });
        } else {
            debug!("onAction without both messages, not dispatched");
        }

        if let Some(hook) = &self.hooks.on_action {
            hook(&params);
        }
    }

    /// The component rewrote the message it is rendering.
    pub fn on_update_message(&self, updated_content: &str) {
        match &self.message {
            Some(message) => self.dispatch(BridgeAction::UpdateMessage {
                message: message.clone(),
                updated_content: updated_content.to_string(),
            }),
            None => debug!("onUpdateMessage on a view without a message, not dispatched"),
        }

        if let Some(hook) = &self.hooks.on_update_message {
            hook(updated_content);
        }
    }

    fn dispatch(&self, action: BridgeAction) {
        let kind = action.kind();
        if self.sink.send(action).is_err() {
            warn!(kind, "Relay detached, dropping action");
        }
    }
}
