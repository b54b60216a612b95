//! HTTP surface of the gateway
//!
//! Hosts the admin-ajax style chat proxy, the content-saved hook and the
//! widget renderer.

mod assets;
mod handlers;
mod types;
mod widget;

pub use handlers::create_router;
pub use types::*;

use crate::config::Config;
use crate::content_sync::ContentSync;
use crate::nonce::NonceService;
use crate::rag::RagBackend;
use std::sync::Arc;

/// Path of the chat proxy endpoint
pub const AJAX_PATH: &str = "/wp-admin/admin-ajax.php";

/// Routing key the chat proxy answers to
pub const AJAX_ACTION: &str = "rag_chatbot_query";

/// Path where clients fetch the endpoint URL and nonce
pub const WIDGET_CONFIG_PATH: &str = "/widget/config";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn RagBackend>,
    pub nonces: Arc<NonceService>,
    pub content_sync: ContentSync,
    pub ajax_url: Arc<str>,
    pub hook_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(config: &Config, backend: Arc<dyn RagBackend>) -> Self {
        let nonces = match &config.nonce_secret {
            Some(secret) => NonceService::new(secret.as_bytes(), config.nonce_lifetime),
            None => NonceService::with_random_secret(config.nonce_lifetime),
        };

        Self {
            content_sync: ContentSync::new(backend.clone()),
            backend,
            nonces: Arc::new(nonces),
            ajax_url: config.ajax_url().into(),
            hook_token: config.hook_token.as_deref().map(Arc::from),
        }
    }
}
