//! HTTP API: the chat proxy endpoint and the embedded web UI

mod assets;
mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::config::ChatConfig;
use crate::llm::LlmService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ChatConfig>,
    /// `None` when no API key is configured
    pub llm: Option<Arc<dyn LlmService>>,
}

impl AppState {
    pub fn new(config: ChatConfig, llm: Option<Arc<dyn LlmService>>) -> Self {
        Self {
            config: Arc::new(config),
            llm,
        }
    }
}
