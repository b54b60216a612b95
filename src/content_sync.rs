//! Content sync hook
//!
//! Turns a content-saved notification into a plain-text document and pushes
//! it to the RAG service. Delivery is at most once and best effort: the push
//! runs detached, nothing waits on it, and failures are only logged.

use crate::rag::{ContentDocument, ContentMetadata, RagBackend};
use crate::text::strip_all_tags;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Notification that a piece of content was created or updated
#[derive(Debug, Clone, Deserialize)]
pub struct ContentSavedEvent {
    pub post_id: u64,
    #[serde(default = "default_post_type")]
    pub post_type: String,
    #[serde(default)]
    pub title: String,
    /// Stored body, usually HTML
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub permalink: String,
    /// Revision snapshots are never indexed
    #[serde(default)]
    pub is_revision: bool,
}

fn default_post_type() -> String {
    "post".to_string()
}

impl ContentSavedEvent {
    pub fn to_document(&self) -> ContentDocument {
        ContentDocument {
            id: self.post_id.to_string(),
            text: strip_all_tags(&self.content),
            metadata: ContentMetadata {
                title: self.title.clone(),
                content_type: self.post_type.clone(),
                url: self.permalink.clone(),
            },
        }
    }
}

/// What the hook did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDisposition {
    Skipped,
    Dispatched,
}

#[derive(Clone)]
pub struct ContentSync {
    backend: Arc<dyn RagBackend>,
}

impl ContentSync {
    pub fn new(backend: Arc<dyn RagBackend>) -> Self {
        Self { backend }
    }

    /// Handle a save. Returns the push task handle when one was spawned;
    /// callers are free to drop it.
    pub fn on_content_saved(
        &self,
        event: &ContentSavedEvent,
    ) -> (SyncDisposition, Option<JoinHandle<()>>) {
        if event.is_revision {
            tracing::debug!(post_id = event.post_id, "Skipping revision");
            return (SyncDisposition::Skipped, None);
        }

        let document = event.to_document();
        let backend = self.backend.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = backend.push_content(&document).await {
                tracing::warn!(
                    content_id = %document.id,
                    kind = e.kind.label(),
                    error = %e,
                    "Dropping content update"
                );
            }
        });

        (SyncDisposition::Dispatched, Some(handle))
    }
}
