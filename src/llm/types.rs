//! Common types for provider calls

use crate::chat::ChatMessage;

/// One chat-completion request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Provider reply, before any emptiness check
#[derive(Debug, Clone, Default)]
pub struct LlmResponse {
    /// Content of the first choice, exactly as returned
    pub content: Option<String>,
    pub usage: Usage,
}

impl LlmResponse {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            usage: Usage::default(),
        }
    }

    /// Trimmed reply text, `None` when absent or blank
    pub fn text(&self) -> Option<String> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
