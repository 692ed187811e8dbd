//! Properties the host passes to the embedded component.

use serde::{Deserialize, Serialize};

use genui_bridge_core::{MessageRef, ModelDescriptor};

/// Current property set of one embedded message view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenUiProps {
    /// Message this view renders. Edits are reported against it.
    #[serde(default)]
    pub message: Option<MessageRef>,
    #[serde(default)]
    pub content: String,
    /// `false` while the response is still streaming.
    #[serde(default = "default_done")]
    pub done: bool,
    #[serde(default)]
    pub model: Option<ModelDescriptor>,
    #[serde(default)]
    pub top_padding: bool,
    #[serde(default)]
    pub source_ids: Vec<String>,
}

fn default_done() -> bool {
    true
}

impl Default for GenUiProps {
    fn default() -> Self {
        Self {
            message: None,
            content: String::new(),
            done: true,
            model: None,
            top_padding: false,
            source_ids: Vec::new(),
        }
    }
}

impl GenUiProps {
    pub fn is_streaming(&self) -> bool {
        !self.done
    }

    /// Shallow merge: every field present in `patch` replaces the current one.
    pub fn apply(&mut self, patch: PropsPatch) {
        if let Some(message) = patch.message {
            self.message = Some(message);
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(done) = patch.done {
            self.done = done;
        }
        if let Some(model) = patch.model {
            self.model = Some(model);
        }
        if let Some(top_padding) = patch.top_padding {
            self.top_padding = top_padding;
        }
        if let Some(source_ids) = patch.source_ids {
            self.source_ids = source_ids;
        }
    }
}

/// Partial update for [`GenUiProps`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_padding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ids: Option<Vec<String>>,
}

impl PropsPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }
}

/// Payload of the component's `onAction` callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParams {
    pub llm_friendly_message: String,
    pub human_friendly_message: String,
}
