//! `DeepSeek` chat server
//!
//! Serves the web chat UI and proxies transcripts to the provider.

use deepseek_chat::api::{create_router, AppState};
use deepseek_chat::config::{load_env_file, ChatConfig};
use deepseek_chat::llm::service_from_config;
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deepseek_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration is resolved once and shared read-only
    load_env_file(None);
    let config = ChatConfig::from_env();
    let llm = service_from_config(&config)?;

    if llm.is_some() {
        tracing::info!(
            model = %config.model,
            base_url = %config.base_url,
            temperature = config.temperature,
            max_tokens = config.max_tokens,
            "Provider configured"
        );
    } else {
        tracing::warn!("DEEPSEEK_API_KEY is not set; chat requests will fail until it is configured");
    }

    let port = config.port;
    let state = AppState::new(config, llm);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("DeepSeek chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
