//! Outbound message batch passed through pipeline stages.
//!
//! Only the fields the session hook touches are typed. Everything else in a
//! message or batch is kept verbatim through `#[serde(flatten)]`, so a batch
//! round-trips without losing provider-specific data.

use serde::{Deserialize, Serialize};
use serde_json::Map;

/// A batch of messages plus any extra request fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageBatch {
    /// Messages in conversation order.
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Untyped batch fields.
    #[serde(flatten)]
    pub extra: Map<String, serde_json::Value>,
}

impl MessageBatch {
    /// Batch of `messages` with no extra fields.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            extra: Map::new(),
        }
    }
}

/// One message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Author role (`user`, `assistant`, ...).
    pub role: String,
    /// Message body.
    pub content: MessageContent,
    /// Untyped message fields.
    #[serde(flatten)]
    pub extra: Map<String, serde_json::Value>,
}

impl Message {
    /// A `user` message with plain-text content.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: MessageContent::Text(text.into()),
            extra: Map::new(),
        }
    }
}

/// Message content in any of the shapes seen on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain string.
    Text(String),
    /// Ordered content parts.
    Parts(Vec<ContentPart>),
    /// A single structured part.
    Part(ContentPart),
    /// Any other array, e.g. untyped or mixed elements.
    List(Vec<serde_json::Value>),
    /// Anything else, kept as-is.
    Other(serde_json::Value),
}

impl MessageContent {
    /// Put `block` in front of the content.
    ///
    /// Strings get the block prefixed, any list gets a new text part at
    /// index 0, and a single text part gets its text prefixed. Other shapes
    /// are left alone and `false` is returned.
    pub fn prepend_text(&mut self, block: &str) -> bool {
        match self {
            Self::Text(text) => {
                text.insert_str(0, block);
                true
            }
            Self::Parts(parts) => {
                parts.insert(0, ContentPart::text(block));
                true
            }
            Self::List(items) => {
                items.insert(0, serde_json::json!({"type": "text", "text": block}));
                true
            }
            Self::Part(part) if part.is_text() => {
                part.text.get_or_insert_with(String::new).insert_str(0, block);
                true
            }
            Self::Part(_) | Self::Other(_) => false,
        }
    }
}

/// A typed content part (`{"type": "...", ...}`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    /// Part type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Text body for text parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Untyped part fields.
    #[serde(flatten)]
    pub extra: Map<String, serde_json::Value>,
}

impl ContentPart {
    /// A `text` part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".into(),
            text: Some(text.into()),
            extra: Map::new(),
        }
    }

    /// Whether this is a `text` part.
    pub fn is_text(&self) -> bool {
        self.kind == "text"
    }
}
