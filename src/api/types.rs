//! API request and response types

use crate::chat::{ChatMessage, WireMessage};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`
#[derive(Debug, Default, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub messages: Option<Vec<WireMessage>>,
}

/// Successful reply
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub message: ChatMessage,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
