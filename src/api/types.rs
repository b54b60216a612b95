//! API request and response types

use crate::content_sync::SyncDisposition;
use serde::{Deserialize, Serialize};

/// Form body posted to the chat proxy
#[derive(Debug, Deserialize)]
pub struct AjaxRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub query: String,
    /// Browsers post arrays as repeated `context[]` keys
    #[serde(default, rename = "context[]", alias = "context")]
    pub context: Vec<String>,
}

/// Response for the content-saved hook
#[derive(Debug, Serialize)]
pub struct HookResponse {
    pub status: SyncDisposition,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
