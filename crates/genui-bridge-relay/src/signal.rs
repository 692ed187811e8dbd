//! Host event wire format.
//!
//! Hosts that cannot hand out typed [`BridgeAction`]s forward DOM-style
//! events instead: `{"event": "send-user-message", "detail": {...}}`.

use serde::{Deserialize, Serialize};

use genui_bridge_core::{BridgeAction, MessageRef};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendUserMessageDetail {
    #[serde(default)]
    pub display_message: Option<String>,
    #[serde(default)]
    pub llm_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMessageDetail {
    /// Composite `<scope>-<messageId>` id.
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub updated_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "detail", rename_all = "kebab-case")]
pub enum InboundSignal {
    SendUserMessage(SendUserMessageDetail),
    UpdateMessage(UpdateMessageDetail),
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl InboundSignal {
    /// Convert to a typed action. Incomplete payloads give `None`.
    pub fn into_action(self) -> Option<BridgeAction> {
        match self {
            Self::SendUserMessage(detail) => Some(BridgeAction::SendUserMessage {
                display_message: non_empty(detail.display_message)?,
                llm_message: non_empty(detail.llm_message)?,
            }),
            Self::UpdateMessage(detail) => {
                let composite = non_empty(detail.message_id)?;
                Some(BridgeAction::UpdateMessage {
                    message: MessageRef::parse_composite(&composite),
                    updated_content: non_empty(detail.updated_content)?,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_signal_decodes() {
        let json = r#"{"event": "send-user-message",
                       "detail": {"displayMessage": "Show flights", "llmMessage": "list flights LHR-JFK"}}"#;
        let signal: InboundSignal = serde_json::from_str(json).unwrap();
        assert_eq!(
            signal.into_action(),
            Some(BridgeAction::SendUserMessage {
                display_message: "Show flights".into(),
                llm_message: "list flights LHR-JFK".into(),
            })
        );
    }

    #[test]
    fn test_update_signal_parses_composite_id() {
        let json = r#"{"event": "update-message",
                       "detail": {"messageId": "chat7-a1b2-c3", "updatedContent": "<form/>"}}"#;
        let signal: InboundSignal = serde_json::from_str(json).unwrap();
        match signal.into_action() {
            Some(BridgeAction::UpdateMessage { message, updated_content }) => {
                assert_eq!(message.message_id, "a1b2-c3");
                assert_eq!(updated_content, "<form/>");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_payloads_are_dropped() {
        let cases = [
            r#"{"event": "send-user-message", "detail": {"displayMessage": "only display"}}"#,
            r#"{"event": "send-user-message", "detail": {"displayMessage": "", "llmMessage": "x"}}"#,
            r#"{"event": "update-message", "detail": {"updatedContent": "x"}}"#,
            r#"{"event": "update-message", "detail": {"messageId": "s-m1", "updatedContent": ""}}"#,
        ];
        for json in cases {
            let signal: InboundSignal = serde_json::from_str(json).unwrap();
            assert!(signal.into_action().is_none(), "{json}");
        }
    }

    #[test]
    fn test_unknown_event_fails_to_decode() {
        let json = r#"{"event": "c1-history-updated", "detail": {}}"#;
        assert!(serde_json::from_str::<InboundSignal>(json).is_err());
    }
}
