//! Chat agent used by the terminal client
//!
//! Wraps the provider with a persona: a fixed set of system instructions is
//! prepended to every transcript before it is sent.

use crate::chat::ChatMessage;
use crate::config::ChatConfig;
use crate::llm::{LlmError, LlmRequest, LlmService};
use std::sync::Arc;

pub const AGENT_ID: &str = "mastra-chat-agent";
pub const AGENT_NAME: &str = "Mastra中文聊天助手";

/// Printed when the model answers with nothing
pub const NO_TEXT_REPLY: &str = "（模型未返回文字内容）";

const INSTRUCTIONS: &[&str] = &[
    "你是一个由 Mastra 框架驱动的中文 AI 助手，需要保持热情、专业且简洁清楚的回答。",
    "当用户询问 Mastra 时，记得说明它是一个基于 TypeScript 的开源 Agent 框架，提供工作流、工具调用、记忆、RAG、模型路由和评测等能力，可快速打造 AI 应用。",
    "当上下文无特别要求时，默认使用中文回答。",
];

pub struct ChatAgent {
    llm: Arc<dyn LlmService>,
    instructions: Vec<String>,
    temperature: f32,
    max_tokens: u32,
}

impl ChatAgent {
    pub fn new(llm: Arc<dyn LlmService>, config: &ChatConfig) -> Self {
        Self {
            llm,
            instructions: INSTRUCTIONS.iter().map(|s| (*s).to_string()).collect(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Replace the default persona
    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn model_id(&self) -> &str {
        self.llm.model_id()
    }

    fn system_prompt(&self) -> Option<ChatMessage> {
        if self.instructions.is_empty() {
            None
        } else {
            Some(ChatMessage::system(self.instructions.join("\n")))
        }
    }

    /// Answer the last turn of `transcript`
    pub async fn generate(&self, transcript: &[ChatMessage]) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.extend(self.system_prompt());
        messages.extend_from_slice(transcript);

        let request = LlmRequest {
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(&request).await?;
        Ok(response.text().unwrap_or_else(|| NO_TEXT_REPLY.to_string()))
    }
}
