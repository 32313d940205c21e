//! The unit passed across an agent-to-agent handoff boundary.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{HistoryEntry, RunItem};

/// History and run items handed from the outgoing agent to the next one.
///
/// `pre_handoff_items` and `new_items` are shared immutable slices: filters
/// that leave them alone pass the same allocation through, so callers holding
/// the input payload keep a valid view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandoffPayload {
    #[serde(rename = "input_history", alias = "prior_history", default)]
    pub prior_history: Vec<HistoryEntry>,
    #[serde(default = "no_items")]
    pub pre_handoff_items: Arc<[RunItem]>,
    #[serde(default = "no_items")]
    pub new_items: Arc<[RunItem]>,
}

fn no_items() -> Arc<[RunItem]> {
    Arc::from(Vec::new())
}

impl Default for HandoffPayload {
    fn default() -> Self {
        Self {
            prior_history: Vec::new(),
            pre_handoff_items: no_items(),
            new_items: no_items(),
        }
    }
}

impl HandoffPayload {
    pub fn new(
        prior_history: Vec<HistoryEntry>,
        pre_handoff_items: Vec<RunItem>,
        new_items: Vec<RunItem>,
    ) -> Self {
        Self {
            prior_history,
            pre_handoff_items: Arc::from(pre_handoff_items),
            new_items: Arc::from(new_items),
        }
    }

    /// Same items, different history.
    pub fn with_prior_history(&self, prior_history: Vec<HistoryEntry>) -> Self {
        Self {
            prior_history,
            pre_handoff_items: Arc::clone(&self.pre_handoff_items),
            new_items: Arc::clone(&self.new_items),
        }
    }

    /// Flatten into the input list for the next agent:
    /// history, then pre-handoff items, then new items.
    pub fn to_input_list(&self) -> Vec<HistoryEntry> {
        self.prior_history
            .iter()
            .cloned()
            .chain(self.pre_handoff_items.iter().map(RunItem::to_input_entry))
            .chain(self.new_items.iter().map(RunItem::to_input_entry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Message;
    use serde_json::json;

    #[test]
    fn deserializes_wire_shape_with_missing_items() {
        let payload: HandoffPayload = serde_json::from_value(json!({
            "input_history": [{"role": "user", "content": "Hi"}]
        }))
        .unwrap();
        assert_eq!(payload.prior_history.len(), 1);
        assert!(payload.pre_handoff_items.is_empty());
        assert!(payload.new_items.is_empty());
    }

    #[test]
    fn accepts_prior_history_alias() {
        let payload: HandoffPayload =
            serde_json::from_value(json!({"prior_history": []})).unwrap();
        assert!(payload.prior_history.is_empty());
    }

    #[test]
    fn input_list_orders_history_then_items() {
        let payload = HandoffPayload::new(
            vec![Message::user("Hi").into()],
            vec![RunItem::ToolCallOutput {
                agent: "a".into(),
                call_id: "c1".into(),
                output: json!("42"),
            }],
            vec![RunItem::MessageOutput {
                agent: "a".into(),
                message: Message::assistant("done"),
            }],
        );
        let list = payload.to_input_list();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0], Message::user("Hi").into());
        assert_eq!(list[2], Message::assistant("done").into());
    }
}
