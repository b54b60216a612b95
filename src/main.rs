//! RAG Chatbot gateway server

use rag_chatbot::api::{create_router, AppState};
use rag_chatbot::config::Config;
use rag_chatbot::rag::{HttpRagBackend, LoggingBackend};
use std::net::SocketAddr;
use std::sync::Arc;
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
                .unwrap_or_else(|_| "rag_chatbot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env()?;
    if config.nonce_secret.is_none() {
        tracing::warn!("RAG_CHATBOT_NONCE_SECRET not set; nonces will not survive a restart");
    }
    if config.hook_token.is_none() {
        tracing::warn!("RAG_CHATBOT_HOOK_TOKEN not set; content hook is unauthenticated");
    }

    // RAG service client
    let backend = HttpRagBackend::new(&config.api_url, config.upstream_timeout)?;
    let backend = Arc::new(LoggingBackend::new(Arc::new(backend)));
    tracing::info!(api_url = %config.api_url, "RAG backend configured");

    // Create application state
    let state = AppState::new(&config, backend);

    // Create router
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
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(ajax_url = %config.ajax_url(), "RAG chatbot gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
