//! Core types, conversation tree, config, and errors for genui-bridge.

pub mod action;
pub mod config;
pub mod error;
pub mod tree;
pub mod types;

pub use action::{ActionReceiver, ActionSink, BridgeAction, action_channel};
pub use tree::{ConversationTree, SharedHistory, append_user_message, build_path};
pub use types::{Message, MessageRef, ModelDescriptor, Role};
