//! Chat transcript types shared by the web proxy and the terminal loop

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    /// Parse a wire role. Anything other than the three known roles is rejected.
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a message with a fresh `{role}-{uuid}` id
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", role.as_str(), uuid::Uuid::new_v4()),
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }
}

/// Message as it arrives from a client, before the role is checked.
///
/// Fields are kept as raw JSON so a single odd entry (numeric id, `null`
/// role) is filtered out instead of failing the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub role: Value,
    #[serde(default)]
    pub content: Value,
}

impl WireMessage {
    pub fn new(id: &str, role: &str, content: &str) -> Self {
        Self {
            id: Value::from(id),
            role: Value::from(role),
            content: Value::from(content),
        }
    }

    /// Known role, or `None` for unknown strings and non-string roles
    pub fn role(&self) -> Option<ChatRole> {
        self.role.as_str().and_then(ChatRole::parse)
    }
}

/// Opaque text for id/content values: strings as-is, `null` as empty,
/// anything else as its JSON text.
fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Keep only messages with a known role, preserving order
pub fn filter_known_roles(messages: Vec<WireMessage>) -> Vec<ChatMessage> {
    messages
        .into_iter()
        .filter_map(|m| {
            let role = m.role()?;
            Some(ChatMessage {
                id: value_text(m.id),
                role,
                content: value_text(m.content),
            })
        })
        .collect()
}

/// Ordered conversation history owned by one caller
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Remove the newest message, used to roll back an unanswered turn
    pub fn pop(&mut self) -> Option<ChatMessage> {
        self.messages.pop()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
