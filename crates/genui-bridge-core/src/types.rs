use std::fmt;

use serde::{Deserialize, Serialize};

/// Author of a message in the conversation tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
    /// Any role this crate does not interpret, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

/// A single node of the conversation tree.
///
/// Field names follow the host's history JSON (`parentId`, `childrenIds`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub parent_id: Option<String>,
    #[serde(default)]
    pub children_ids: Vec<String>,
    pub role: Role,
    pub content: String,
    /// Pre-edit snapshot, written on the first edit only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(default)]
    pub models: Vec<String>,
}

impl Message {
    /// A fresh user message with no links yet.
    pub fn user(id: impl Into<String>, content: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            children_ids: Vec::new(),
            role: Role::User,
            content: content.into(),
            original_content: None,
            timestamp: chrono::Utc::now().timestamp(),
            models,
        }
    }

    /// Replace the content, keeping the very first version in `original_content`.
    pub fn apply_edit(&mut self, content: impl Into<String>) {
        if self.original_content.is_none() {
            self.original_content = Some(self.content.clone());
        }
        self.content = content.into();
    }
}

/// Model metadata used to pick a renderer. Only the id/name prefixes matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ModelDescriptor {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }
}

/// Structured reference to a message rendered inside a UI scope.
///
/// Hosts that render embedded components usually key them as
/// `<scope>-<messageId>`. Carrying both parts separately avoids having to
/// split that string again, which is ambiguous when the message id itself
/// contains `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub message_id: String,
}

impl MessageRef {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            scope: None,
            message_id: message_id.into(),
        }
    }

    pub fn scoped(scope: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            message_id: message_id.into(),
        }
    }

    /// Parse a legacy `<scope>-<messageId>` string.
    ///
    /// Everything up to and including the first `-` is the scope. Without a
    /// separator the message id is empty and will never resolve.
    pub fn parse_composite(composite: &str) -> Self {
        match composite.split_once('-') {
            Some((scope, id)) => Self::scoped(scope, id),
            None => Self {
                scope: Some(composite.to_string()),
                message_id: String::new(),
            },
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{scope}-{}", self.message_id),
            None => f.write_str(&self.message_id),
        }
    }
}
