//! Terminal chat client
//!
//! Discovers the proxy endpoint and nonce from a running gateway, then runs
//! one chat session over stdin/stdout. Commands: `/open`, `/close`, `/quit`.

use rag_chatbot::config::parse_secs;
use rag_chatbot::session::{ChatSession, HttpTransport, SessionConfig, TerminalView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics go to stderr so they never interleave with the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_chatbot=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let gateway_url =
        std::env::var("RAG_CHAT_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());
    let mut config = SessionConfig::default();
    if let Ok(value) = std::env::var("RAG_CHAT_TIMEOUT_SECS") {
        config.request_timeout = parse_secs("RAG_CHAT_TIMEOUT_SECS", value)?;
    }

    let transport = HttpTransport::discover(&gateway_url).await?;
    tracing::info!(ajax_url = %transport.config().ajax_url, "Connected to gateway");
    let view = TerminalView::new(std::io::stdout());
    let mut session = ChatSession::new(transport, view, config);
    session.toggle();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/open" if !session.is_open() => session.toggle(),
            "/close" if session.is_open() => session.toggle(),
            "/open" | "/close" => {}
            _ => {
                if let Err(e) = session.submit(&line).await {
                    tracing::warn!(error = %e, "Submission rejected");
                }
            }
        }
    }

    Ok(())
}
