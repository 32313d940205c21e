//! Structural run items produced while an agent executes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::message::{HistoryEntry, Message, Role};

/// A non-message artifact of agent execution, or a message an agent produced.
///
/// Items are preserved verbatim across a handoff; only prior history is ever
/// summarized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunItem {
    MessageOutput {
        agent: String,
        message: Message,
    },
    ToolCall {
        agent: String,
        call_id: String,
        name: String,
        #[serde(default)]
        arguments: Value,
    },
    ToolCallOutput {
        agent: String,
        call_id: String,
        output: Value,
    },
    HandoffCall {
        agent: String,
        call_id: String,
        target: String,
    },
    HandoffOutput {
        agent: String,
        call_id: String,
        source_agent: String,
        target_agent: String,
    },
}

impl RunItem {
    /// Name of the agent that produced this item.
    pub fn agent(&self) -> &str {
        match self {
            Self::MessageOutput { agent, .. }
            | Self::ToolCall { agent, .. }
            | Self::ToolCallOutput { agent, .. }
            | Self::HandoffCall { agent, .. }
            | Self::HandoffOutput { agent, .. } => agent,
        }
    }

    /// Wire name of the item kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MessageOutput { .. } => "message_output",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolCallOutput { .. } => "tool_call_output",
            Self::HandoffCall { .. } => "handoff_call",
            Self::HandoffOutput { .. } => "handoff_output",
        }
    }

    /// True for tool invocations, tool results and handoff plumbing.
    pub fn is_tool_related(&self) -> bool {
        !matches!(self, Self::MessageOutput { .. })
    }

    /// The message carried by a `message_output` item.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::MessageOutput { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Convert this item into the history entry fed to the next model call.
    pub fn to_input_entry(&self) -> HistoryEntry {
        match self {
            Self::MessageOutput { message, .. } => HistoryEntry::Message(message.clone()),
            Self::ToolCall {
                call_id,
                name,
                arguments,
                ..
            } => HistoryEntry::Opaque(json!({
                "type": "function_call",
                "call_id": call_id,
                "name": name,
                "arguments": arguments_string(arguments),
            })),
            Self::ToolCallOutput {
                call_id, output, ..
            } => HistoryEntry::Opaque(json!({
                "type": "function_call_output",
                "call_id": call_id,
                "output": output_string(output),
            })),
            Self::HandoffCall {
                call_id, target, ..
            } => HistoryEntry::Opaque(json!({
                "type": "function_call",
                "call_id": call_id,
                "name": transfer_tool_name(target),
                "arguments": "{}",
            })),
            Self::HandoffOutput {
                call_id,
                target_agent,
                ..
            } => HistoryEntry::Opaque(json!({
                "type": "function_call_output",
                "call_id": call_id,
                "output": json!({ "assistant": target_agent }).to_string(),
            })),
        }
    }

    /// Role of the carried message, if any.
    pub fn role(&self) -> Option<Role> {
        self.message().map(|m| m.role)
    }
}

/// Tool name under which a handoff to `target` is exposed to the model.
///
/// `"Spanish Assistant"` becomes `transfer_to_spanish_assistant`.
pub fn transfer_tool_name(target: &str) -> String {
    let mut name = String::from("transfer_to_");
    let mut last_was_sep = true;
    for ch in target.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            name.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            name.push('_');
            last_was_sep = true;
        }
    }
    if name.ends_with('_') && name.len() > "transfer_to_".len() {
        name.pop();
    }
    name
}

fn arguments_string(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        Value::Null => "{}".to_string(),
        other => other.to_string(),
    }
}

fn output_string(output: &Value) -> String {
    match output {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tool_output_becomes_function_call_output() {
        let item = RunItem::ToolCallOutput {
            agent: "Weather agent".into(),
            call_id: "call_001".into(),
            output: json!("Sunny, 20°C"),
        };
        assert_eq!(
            item.to_input_entry(),
            HistoryEntry::Opaque(json!({
                "call_id": "call_001",
                "output": "Sunny, 20°C",
                "type": "function_call_output"
            }))
        );
    }

    #[test]
    fn tool_call_arguments_are_stringified() {
        let item = RunItem::ToolCall {
            agent: "a".into(),
            call_id: "c".into(),
            name: "get_weather".into(),
            arguments: json!({"city": "London"}),
        };
        let HistoryEntry::Opaque(value) = item.to_input_entry() else {
            panic!("expected opaque entry");
        };
        assert_eq!(value["arguments"], json!("{\"city\":\"London\"}"));
    }

    #[test]
    fn transfer_names_are_snake_case() {
        assert_eq!(
            transfer_tool_name("Spanish Assistant"),
            "transfer_to_spanish_assistant"
        );
        assert_eq!(transfer_tool_name("  Billing--Desk! "), "transfer_to_billing_desk");
    }

    #[test]
    fn items_round_trip_with_type_tag() {
        let raw = json!({
            "type": "handoff_call",
            "agent": "Assistant",
            "call_id": "call_9",
            "target": "Spanish Assistant"
        });
        let item: RunItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(item.kind(), "handoff_call");
        assert!(item.is_tool_related());
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }
}
