//! Single round trip from a client transcript to one assistant reply

use crate::chat::{filter_known_roles, ChatMessage, WireMessage};
use crate::config::ChatConfig;
use crate::llm::{LlmError, LlmRequest, LlmService};
use thiserror::Error;

pub const EMPTY_INPUT_MESSAGE: &str = "请输入问题或提供上下文。";
pub const MISSING_KEY_MESSAGE: &str = "缺少 DEEPSEEK_API_KEY，请先在 .env 中配置。";
pub const UNAVAILABLE_MESSAGE: &str = "服务暂时不可用，请稍后再试。";

/// Why a proxied chat turn failed
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No user/assistant/system messages left after filtering
    #[error("transcript is empty")]
    EmptyTranscript,
    #[error("DEEPSEEK_API_KEY is not configured")]
    MissingApiKey,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("provider call failed: {0}")]
    Provider(#[from] LlmError),
}

impl ProxyError {
    /// Text shown to the end user. Provider details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyTranscript => EMPTY_INPUT_MESSAGE,
            Self::MissingApiKey => MISSING_KEY_MESSAGE,
            Self::MalformedBody(_) | Self::Provider(_) => UNAVAILABLE_MESSAGE,
        }
    }
}

/// Forward a client transcript and return the assistant's reply.
///
/// Validation happens before the key check, and both before the provider is
/// touched.
pub async fn answer(
    llm: Option<&dyn LlmService>,
    config: &ChatConfig,
    messages: Vec<WireMessage>,
) -> Result<ChatMessage, ProxyError> {
    let history = filter_known_roles(messages);
    if history.is_empty() {
        return Err(ProxyError::EmptyTranscript);
    }

    let llm = llm.ok_or(ProxyError::MissingApiKey)?;

    let request = LlmRequest {
        messages: history,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };
    let response = llm.complete(&request).await?;

    let text = response
        .text()
        .ok_or_else(|| LlmError::empty_response("Provider returned no usable content"))?;

    Ok(ChatMessage::assistant(text))
}
