//! Conversation tree — message map, active pointer, path reconstruction, and append.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{BridgeError, Result};
use crate::types::Message;

/// History handle shared between the host and the bridge.
///
/// The bridge only mutates fields behind the lock; it never swaps the `Arc`
/// because other observers hold the same reference.
pub type SharedHistory = Arc<RwLock<ConversationTree>>;

/// Branching chat history: every message keyed by id plus the active leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTree {
    #[serde(default)]
    pub messages: HashMap<String, Message>,
    #[serde(default)]
    pub current_id: Option<String>,
}

impl ConversationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the tree for shared mutation.
    pub fn shared(self) -> SharedHistory {
        Arc::new(RwLock::new(self))
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.get_mut(id)
    }

    /// Path from the root ancestor of `id` down to `id`.
    pub fn path_to(&self, id: &str) -> Vec<&Message> {
        build_path(self, Some(id))
    }

    /// Path ending at the active message.
    pub fn current_path(&self) -> Vec<&Message> {
        build_path(self, self.current_id.as_deref())
    }

    /// Read a history JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let tree: ConversationTree = serde_json::from_str(&raw)?;
        if let Some(current) = &tree.current_id {
            if !tree.messages.contains_key(current) {
                return Err(BridgeError::History(format!(
                    "currentId '{current}' does not refer to a message"
                )));
            }
        }
        Ok(tree)
    }

    /// Write the tree back as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Walk parent links from `start_id` to the root and return the chain root-first.
///
/// An absent or unknown `start_id` gives an empty path. A `parentId` that
/// points at a missing message ends the walk there, and a cycle ends it at the
/// first repeated id, so the result is always finite.
pub fn build_path<'a>(tree: &'a ConversationTree, start_id: Option<&str>) -> Vec<&'a Message> {
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = start_id.and_then(|id| tree.messages.get(id));

    while let Some(message) = cursor {
        if !seen.insert(message.id.as_str()) {
            warn!(message_id = %message.id, "Cycle in conversation tree, truncating path");
            break;
        }
        path.push(message);
        cursor = match message.parent_id.as_deref() {
            Some(parent_id) => {
                let parent = tree.messages.get(parent_id);
                if parent.is_none() {
                    debug!(message_id = %message.id, parent_id, "Broken parent link");
                }
                parent
            }
            None => None,
        };
    }

    path.reverse();
    path
}

/// Append a user message under the active leaf and make it the new active leaf.
///
/// Returns the generated id so the caller can hand it to the send pathway.
pub fn append_user_message(
    tree: &mut ConversationTree,
    display_content: &str,
    model_ids: &[String],
) -> String {
    let id = uuid::Uuid::new_v4().to_string();
    let parent_id = tree.current_path().last().map(|m| m.id.clone());

    let mut message = Message::user(id.clone(), display_content, model_ids.to_vec());
    message.parent_id = parent_id.clone();

    tree.messages.insert(id.clone(), message);
    tree.current_id = Some(id.clone());

    if let Some(parent) = parent_id.and_then(|pid| tree.messages.get_mut(&pid)) {
        if !parent.children_ids.contains(&id) {
            parent.children_ids.push(id.clone());
        }
    }

    debug!(message_id = %id, "Appended user message");
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn msg(id: &str, parent: Option<&str>, children: &[&str]) -> Message {
        Message {
            id: id.into(),
            parent_id: parent.map(String::from),
            children_ids: children.iter().map(|c| c.to_string()).collect(),
            role: Role::Assistant,
            content: format!("content of {id}"),
            original_content: None,
            timestamp: 0,
            models: vec![],
        }
    }

    fn tree(messages: Vec<Message>, current: Option<&str>) -> ConversationTree {
        ConversationTree {
            messages: messages.into_iter().map(|m| (m.id.clone(), m)).collect(),
            current_id: current.map(String::from),
        }
    }

    fn ids(path: &[&Message]) -> Vec<String> {
        path.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn test_build_path_root_first() {
        let t = tree(
            vec![
                msg("a", None, &["b"]),
                msg("b", Some("a"), &["c", "x"]),
                msg("c", Some("b"), &[]),
                msg("x", Some("b"), &[]),
            ],
            Some("c"),
        );
        let path = build_path(&t, Some("c"));
        assert_eq!(ids(&path), vec!["a", "b", "c"]);

        for pair in path.windows(2) {
            assert_eq!(pair[1].parent_id.as_deref(), Some(pair[0].id.as_str()));
            assert!(pair[0].children_ids.contains(&pair[1].id));
        }

        assert_eq!(ids(&t.path_to("x")), vec!["a", "b", "x"]);
    }

    #[test]
    fn test_build_path_absent_or_unknown_start() {
        let t = tree(vec![msg("a", None, &[])], Some("a"));
        assert!(build_path(&t, None).is_empty());
        assert!(build_path(&t, Some("nope")).is_empty());
        assert!(build_path(&ConversationTree::new(), Some("a")).is_empty());
    }

    #[test]
    fn test_build_path_stops_at_missing_parent() {
        let t = tree(
            vec![msg("b", Some("gone"), &["c"]), msg("c", Some("b"), &[])],
            Some("c"),
        );
        assert_eq!(ids(&t.current_path()), vec!["b", "c"]);
    }

    #[test]
    fn test_build_path_terminates_on_cycle() {
        let t = tree(
            vec![
                msg("a", Some("c"), &["b"]),
                msg("b", Some("a"), &["c"]),
                msg("c", Some("b"), &["a"]),
            ],
            Some("c"),
        );
        let path = build_path(&t, Some("c"));
        assert_eq!(path.len(), 3);
        assert_eq!(path.last().unwrap().id, "c");
    }

    #[test]
    fn test_append_into_empty_tree() {
        let mut t = ConversationTree::new();
        let id = append_user_message(&mut t, "Hello", &["modelA".to_string()]);

        let m = t.get(&id).unwrap();
        assert!(m.parent_id.is_none());
        assert_eq!(m.role, Role::User);
        assert_eq!(m.content, "Hello");
        assert_eq!(m.models, vec!["modelA".to_string()]);
        assert_eq!(t.current_id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_append_links_to_current_tail() {
        let mut t = tree(vec![msg("m1", None, &[])], Some("m1"));
        let id = append_user_message(&mut t, "next", &[]);

        assert_eq!(t.get(&id).unwrap().parent_id.as_deref(), Some("m1"));
        assert_eq!(t.get("m1").unwrap().children_ids, vec![id.clone()]);
        assert_eq!(t.current_id.as_deref(), Some(id.as_str()));
        assert_eq!(ids(&t.current_path()), vec!["m1".to_string(), id]);
    }

    #[test]
    fn test_append_with_dangling_current_starts_new_root() {
        let mut t = tree(vec![msg("m1", None, &[])], Some("missing"));
        let id = append_user_message(&mut t, "fresh", &[]);
        assert!(t.get(&id).unwrap().parent_id.is_none());
        assert!(t.get("m1").unwrap().children_ids.is_empty());
    }

    #[test]
    fn test_load_rejects_dangling_current_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, r#"{"messages": {}, "currentId": "ghost"}"#).unwrap();
        assert!(matches!(
            ConversationTree::load(&path),
            Err(BridgeError::History(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut t = ConversationTree::new();
        let id = append_user_message(&mut t, "persisted", &[]);
        t.save(&path).unwrap();

        let loaded = ConversationTree::load(&path).unwrap();
        assert_eq!(loaded.current_id.as_deref(), Some(id.as_str()));
        assert_eq!(loaded.get(&id).unwrap().content, "persisted");
    }
}
