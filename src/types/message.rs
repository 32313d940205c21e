//! Message types for conversation history.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// Conversation role.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Block kind produced by a model for plain text output.
pub const OUTPUT_TEXT: &str = "output_text";
/// Block kind for user-supplied text.
pub const INPUT_TEXT: &str = "input_text";
/// Block kind for user-supplied images.
pub const INPUT_IMAGE: &str = "input_image";

/// A single typed block of structured message content.
///
/// Only `type` and `text` are interpreted, and only when they are strings.
/// Every other field (`annotations`, `image_url`, `detail`, a non-string
/// `text`, ...) is kept verbatim in `extra` so a block survives a round trip
/// through history untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(from = "Map<String, Value>")]
pub struct ContentBlock {
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for ContentBlock {
    fn from(mut fields: Map<String, Value>) -> Self {
        let kind = match fields.remove("type") {
            Some(Value::String(kind)) => kind,
            Some(other) => {
                fields.insert("type".to_string(), other);
                String::new()
            }
            None => String::new(),
        };
        let text = match fields.remove("text") {
            Some(Value::String(text)) => Some(text),
            Some(Value::Null) | None => None,
            Some(other) => {
                fields.insert("text".to_string(), other);
                None
            }
        };
        Self {
            kind,
            text,
            extra: fields,
        }
    }
}

/// Image detail hint for `input_image` blocks.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageDetail {
    #[default]
    Auto,
    Low,
    High,
}

impl ContentBlock {
    /// Model output text block.
    pub fn output_text(text: impl Into<String>) -> Self {
        let mut extra = Map::new();
        extra.insert("annotations".to_string(), Value::Array(Vec::new()));
        Self {
            kind: OUTPUT_TEXT.to_string(),
            text: Some(text.into()),
            extra,
        }
    }

    /// User input text block.
    pub fn input_text(text: impl Into<String>) -> Self {
        Self {
            kind: INPUT_TEXT.to_string(),
            text: Some(text.into()),
            extra: Map::new(),
        }
    }

    /// Image block pointing at a remote URL.
    pub fn input_image_url(url: impl Into<String>, detail: ImageDetail) -> Self {
        let mut extra = Map::new();
        extra.insert("detail".to_string(), Value::String(detail.to_string()));
        extra.insert("image_url".to_string(), Value::String(url.into()));
        Self {
            kind: INPUT_IMAGE.to_string(),
            text: None,
            extra,
        }
    }

    /// Image block carrying inline bytes as a base64 `data:` URL.
    pub fn input_image_bytes(bytes: &[u8], mime_type: &str, detail: ImageDetail) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self::input_image_url(format!("data:{mime_type};base64,{encoded}"), detail)
    }

    /// The image URL of an `input_image` block.
    pub fn image_url(&self) -> Option<&str> {
        self.extra.get("image_url").and_then(Value::as_str)
    }

    pub fn is_output_text(&self) -> bool {
        self.kind == OUTPUT_TEXT
    }
}

/// Message content: plain text or an ordered list of typed blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<ContentBlock>> for MessageContent {
    fn from(blocks: Vec<ContentBlock>) -> Self {
        Self::Blocks(blocks)
    }
}

/// A single turn in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
    /// Provider fields such as `id`, `status` or `tool_calls`, kept as-is.
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            extra: Map::new(),
        }
    }

    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, MessageContent::Text(text.into()))
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, MessageContent::Text(text.into()))
    }

    /// Create a plain-text assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, MessageContent::Text(text.into()))
    }

    /// Create an assistant message in the structured `output_text` shape models return.
    pub fn assistant_output(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentBlock::output_text(text)])
    }

    /// Create a user message from structured blocks (text, images).
    pub fn user_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self::new(Role::User, blocks)
    }

    /// Concatenate the text of this message.
    ///
    /// Plain content is returned as-is; block content joins every block's `text`.
    pub fn text(&self) -> String {
        match &self.content {
            Some(MessageContent::Text(text)) => text.clone(),
            Some(MessageContent::Blocks(blocks)) => blocks
                .iter()
                .filter_map(|block| block.text.as_deref())
                .collect::<Vec<_>>()
                .join(""),
            None => String::new(),
        }
    }

    /// Whether a chat-completions style `tool_calls` array is attached.
    pub fn has_tool_calls(&self) -> bool {
        self.extra
            .get("tool_calls")
            .and_then(Value::as_array)
            .is_some_and(|calls| !calls.is_empty())
    }
}

/// One element of a conversation history.
///
/// Anything that does not parse as a [`Message`] (function-call items, unknown
/// roles, content that is neither text nor a block list) is carried as an
/// opaque JSON value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum HistoryEntry {
    Message(Message),
    Opaque(Value),
}

impl HistoryEntry {
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(message) => Some(message),
            Self::Opaque(_) => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.as_message().map(|m| m.role)
    }
}

impl From<Message> for HistoryEntry {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}
