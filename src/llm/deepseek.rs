//! `DeepSeek` provider over its `OpenAI`-compatible chat completions API

use super::types::{LlmRequest, LlmResponse, Usage};
use super::{LlmError, LlmService};
use crate::chat::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// `OpenAI`-compatible chat completions client
pub struct DeepSeekService {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl DeepSeekService {
    /// No request timeout is configured; the platform defaults apply.
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: chat_completions_url(base_url),
            model: model.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn translate_request<'a>(&'a self, request: &'a LlmRequest) -> DeepSeekRequest<'a> {
        DeepSeekRequest {
            model: &self.model,
            messages: request.messages.iter().map(DeepSeekMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    fn normalize_response(resp: DeepSeekResponse) -> LlmResponse {
        let content = resp
            .choices
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);

        let usage = resp.usage.map_or_else(Usage::default, |u| Usage {
            input_tokens: u64::from(u.prompt_tokens),
            output_tokens: u64::from(u.completion_tokens),
        });

        LlmResponse { content, usage }
    }
}

#[async_trait]
impl LlmService for DeepSeekService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let body = self.translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<DeepSeekErrorResponse>(&text)
                .map_or(text, |e| e.error.message);
            return Err(LlmError::from_status(status.as_u16(), &message));
        }

        let parsed: DeepSeekResponse = serde_json::from_str(&text).map_err(|e| {
            LlmError::unknown(format!("Failed to parse response: {e} - body: {text}"))
        })?;

        Ok(Self::normalize_response(parsed))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

// DeepSeek API types

#[derive(Debug, Serialize)]
struct DeepSeekRequest<'a> {
    model: &'a str,
    messages: Vec<DeepSeekMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct DeepSeekMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for DeepSeekMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct DeepSeekResponse {
    #[serde(default)]
    choices: Option<Vec<DeepSeekChoice>>,
    #[serde(default)]
    usage: Option<DeepSeekUsage>,
}

#[derive(Debug, Deserialize)]
struct DeepSeekChoice {
    #[serde(default)]
    message: Option<DeepSeekResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct DeepSeekResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)]
struct DeepSeekUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct DeepSeekErrorResponse {
    error: DeepSeekError,
}

#[derive(Debug, Deserialize)]
struct DeepSeekError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmErrorKind;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    fn parse(body: &str) -> LlmResponse {
        DeepSeekService::normalize_response(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            chat_completions_url("https://api.deepseek.com/v1/"),
            "https://api.deepseek.com/v1/chat/completions"
        );
        assert_eq!(
            chat_completions_url("https://api.deepseek.com/v1"),
            "https://api.deepseek.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let service = DeepSeekService::new("sk", "http://x/v1", "deepseek-chat").unwrap();
        let request = LlmRequest {
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("hi")],
            temperature: 0.5,
            max_tokens: 800,
        };
        let body = serde_json::to_value(service.translate_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "deepseek-chat",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ],
                "temperature": 0.5,
                "max_tokens": 800
            })
        );
    }

    #[test]
    fn test_normalize_first_choice() {
        let resp = parse(
            r#"{"choices":[{"message":{"content":"你好"}},{"message":{"content":"second"}}],
                "usage":{"prompt_tokens":12,"completion_tokens":3,"total_tokens":15}}"#,
        );
        assert_eq!(resp.content.as_deref(), Some("你好"));
        assert_eq!(resp.usage.input_tokens, 12);
        assert_eq!(resp.usage.output_tokens, 3);
    }

    #[test]
    fn test_normalize_tolerates_missing_parts() {
        assert_eq!(parse(r#"{"choices":[]}"#).content, None);
        assert_eq!(parse("{}").content, None);
        assert_eq!(parse(r#"{"choices":null}"#).content, None);
        assert_eq!(parse(r#"{"choices":[{}]}"#).content, None);
        assert_eq!(parse(r#"{"choices":[{"message":{}}]}"#).content, None);
    }

    /// Fake provider bound to an ephemeral port
    async fn spawn_provider(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorded = seen.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorded = recorded.clone();
                let reply = reply.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    recorded.lock().unwrap().push(json!({"auth": auth, "body": body}));
                    (status, Json(reply))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1"), seen)
    }

    fn one_question() -> LlmRequest {
        LlmRequest {
            messages: vec![ChatMessage::user("介绍一下你自己")],
            temperature: 0.7,
            max_tokens: 800,
        }
    }

    #[tokio::test]
    async fn test_complete_against_fake_provider() {
        let (base, seen) = spawn_provider(
            StatusCode::OK,
            json!({"choices":[{"message":{"role":"assistant","content":"  我是助手 "}}]}),
        )
        .await;
        let service = DeepSeekService::new("sk-live", &base, "deepseek-chat").unwrap();

        let response = service.complete(&one_question()).await.unwrap();
        assert_eq!(response.text().as_deref(), Some("我是助手"));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["auth"], "Bearer sk-live");
        assert_eq!(seen[0]["body"]["model"], "deepseek-chat");
        assert_eq!(seen[0]["body"]["max_tokens"], 800);
        let mut keys: Vec<_> = seen[0]["body"].as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["max_tokens", "messages", "model", "temperature"]);
        assert_eq!(seen[0]["body"]["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn test_complete_maps_error_status() {
        let (base, _) = spawn_provider(
            StatusCode::UNAUTHORIZED,
            json!({"error":{"message":"invalid api key","type":"authentication_error"}}),
        )
        .await;
        let service = DeepSeekService::new("bad", &base, "deepseek-chat").unwrap();

        let err = service.complete(&one_question()).await.unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Auth);
        assert!(err.message.contains("invalid api key"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let service =
            DeepSeekService::new("sk", &format!("http://{addr}/v1"), "deepseek-chat").unwrap();

        assert!(service.complete(&one_question()).await.is_err());
    }
}
