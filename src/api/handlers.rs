//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{ChatPayload, ChatReply, ErrorResponse};
use super::AppState;
use crate::proxy::{self, ProxyError};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Root serves the chat page
        .route("/", get(serve_index))
        // Static assets (embedded or filesystem fallback)
        .route("/assets/*path", get(serve_static))
        .route("/api/chat", post(chat))
        .route("/version", get(get_version))
        .with_state(state)
}

async fn serve_index() -> Response {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

async fn get_version() -> &'static str {
    concat!("deepseek-chat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Chat proxy
// ============================================================

/// Body is parsed by hand so that a malformed payload surfaces as the
/// generic service error rather than an extractor rejection.
async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatReply>, ProxyError> {
    let payload: ChatPayload =
        serde_json::from_slice(&body).map_err(|e| ProxyError::MalformedBody(e.to_string()))?;

    let message = proxy::answer(
        state.llm.as_deref(),
        &state.config,
        payload.messages.unwrap_or_default(),
    )
    .await?;

    Ok(Json(ChatReply { message }))
}

// ============================================================
// Error Handling
// ============================================================

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::EmptyTranscript => StatusCode::BAD_REQUEST,
            ProxyError::MissingApiKey
            | ProxyError::MalformedBody(_)
            | ProxyError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ProxyError::EmptyTranscript => tracing::debug!("Rejected empty transcript"),
            ProxyError::MissingApiKey => tracing::warn!(error = %self, "Chat API misconfigured"),
            ProxyError::MalformedBody(_) | ProxyError::Provider(_) => {
                tracing::error!(error = %self, "Chat API error");
            }
        }

        let body = Json(ErrorResponse::new(self.user_message()));
        (status, body).into_response()
    }
}
