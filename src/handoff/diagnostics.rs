//! Printable rendering of handoff payloads for logs and the CLI.
//!
//! Nothing here feeds back into filtering.

use serde::Serialize;
use serde_json::Value;

use super::payload::HandoffPayload;
use crate::types::{HistoryEntry, Role, RunItem};

#[derive(Debug, Serialize)]
struct PayloadView<'a> {
    input_history: &'a [HistoryEntry],
    pre_handoff_items: Vec<ItemView<'a>>,
    new_items: Vec<ItemView<'a>>,
}

#[derive(Debug, Serialize)]
struct ItemView<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    agent: &'a str,
    role: Option<Role>,
    content: Value,
}

impl<'a> ItemView<'a> {
    fn of(item: &'a RunItem) -> Self {
        let content = match item {
            RunItem::MessageOutput { message, .. } => {
                serde_json::to_value(&message.content).unwrap_or(Value::Null)
            }
            RunItem::ToolCallOutput { output, .. } => output.clone(),
            _ => Value::Null,
        };
        Self {
            kind: item.kind(),
            agent: item.agent(),
            role: item.role(),
            content,
        }
    }
}

/// Pretty JSON view of a payload: full history, items reduced to
/// `type`, `agent`, `role` and `content`.
pub fn render_payload(payload: &HandoffPayload) -> String {
    let view = PayloadView {
        input_history: &payload.prior_history,
        pre_handoff_items: payload.pre_handoff_items.iter().map(ItemView::of).collect(),
        new_items: payload.new_items.iter().map(ItemView::of).collect(),
    };
    serde_json::to_string_pretty(&view).unwrap_or_default()
}
