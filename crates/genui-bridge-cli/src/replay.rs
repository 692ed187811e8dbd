//! Replay recorded host signals through an [`EventRelay`].

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use genui_bridge_core::{BridgeAction, SharedHistory};
use genui_bridge_relay::{EventRelay, InboundSignal, SendPathway, SendRequest};

/// Send pathway that prints each outbound request as one JSON line.
pub struct PrintingSender;

#[async_trait]
impl SendPathway for PrintingSender {
    async fn send_message(
        &self,
        _history: &SharedHistory,
        message_id: &str,
        request: SendRequest,
    ) -> anyhow::Result<()> {
        let line = json!({ "messageId": message_id, "messages": request.messages });
        println!("{}", serde_json::to_string(&line)?);
        Ok(())
    }
}

/// Parse newline-delimited signals. Undecodable or incomplete lines are skipped.
pub fn parse_signals(raw: &str) -> Vec<BridgeAction> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| {
            let signal: InboundSignal = match serde_json::from_str(line) {
                Ok(s) => s,
                Err(e) => {
                    warn!(line = idx + 1, error = %e, "Skipping undecodable signal");
                    return None;
                }
            };
            let action = signal.into_action();
            if action.is_none() {
                debug!(line = idx + 1, "Skipping incomplete signal");
            }
            action
        })
        .collect()
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub actions: usize,
    pub history_updates: usize,
}

pub async fn replay(relay: &EventRelay, actions: Vec<BridgeAction>) -> ReplaySummary {
    let mut updates = relay.subscribe();
    let mut summary = ReplaySummary::default();

    for action in actions {
        relay.handle(action).await;
        summary.actions += 1;
    }
    while updates.try_recv().is_ok() {
        summary.history_updates += 1;
    }

    info!(actions = summary.actions, updates = summary.history_updates, "Replay finished");
    summary
}
