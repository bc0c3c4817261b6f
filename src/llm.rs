//! LLM provider abstraction
//!
//! The proxy and the terminal agent both talk to the provider through
//! [`LlmService`], so tests can swap in a mock.

mod deepseek;
mod error;
mod types;

#[cfg(test)]
pub mod testing;

pub use deepseek::DeepSeekService;
pub use error::{LlmError, LlmErrorKind};
pub use types::*;

use crate::config::ChatConfig;
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for chat-completion providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a single completion request
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Build the configured provider, wrapped with logging.
///
/// Returns `Ok(None)` when no API key is configured.
pub fn service_from_config(config: &ChatConfig) -> Result<Option<Arc<dyn LlmService>>, LlmError> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Ok(None);
    };
    let service = DeepSeekService::new(api_key, &config.base_url, config.model.as_str())?;
    tracing::debug!(endpoint = %service.endpoint(), model = %config.model, "Provider configured");
    let logged: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(service)));
    Ok(Some(logged))
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    messages = request.messages.len(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
