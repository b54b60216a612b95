//! Client side of the external RAG service
//!
//! The service owns retrieval and generation; this crate only forwards
//! queries to it and notifies it of content changes.

mod client;
mod error;
mod types;

#[cfg(test)]
pub mod testing;

pub use client::HttpRagBackend;
pub use error::{RagError, RagErrorKind};
pub use types::{ContentDocument, ContentMetadata, QueryRequest};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Common interface for the RAG service
#[async_trait]
pub trait RagBackend: Send + Sync {
    /// Answer a query. The returned JSON is relayed to the browser as-is.
    async fn query(&self, request: &QueryRequest) -> Result<Value, RagError>;

    /// Index (or re-index) a piece of site content
    async fn push_content(&self, document: &ContentDocument) -> Result<(), RagError>;
}

#[async_trait]
impl<T: RagBackend + ?Sized> RagBackend for Arc<T> {
    async fn query(&self, request: &QueryRequest) -> Result<Value, RagError> {
        (**self).query(request).await
    }

    async fn push_content(&self, document: &ContentDocument) -> Result<(), RagError> {
        (**self).push_content(document).await
    }
}

/// Logging wrapper for RAG backends
pub struct LoggingBackend {
    inner: Arc<dyn RagBackend>,
}

impl LoggingBackend {
    pub fn new(inner: Arc<dyn RagBackend>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl RagBackend for LoggingBackend {
    async fn query(&self, request: &QueryRequest) -> Result<Value, RagError> {
        let start = std::time::Instant::now();
        let result = self.inner.query(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::info!(
                    duration_ms = %duration.as_millis(),
                    query_len = request.text.len(),
                    context_len = request.context.len(),
                    "RAG query completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.label(),
                    error = %e.message,
                    "RAG query failed"
                );
            }
        }

        result
    }

    async fn push_content(&self, document: &ContentDocument) -> Result<(), RagError> {
        let start = std::time::Instant::now();
        let result = self.inner.push_content(document).await;
        let duration = start.elapsed();

        match &result {
            Ok(()) => {
                tracing::info!(
                    content_id = %document.id,
                    duration_ms = %duration.as_millis(),
                    "Content pushed to RAG service"
                );
            }
            Err(e) => {
                tracing::warn!(
                    content_id = %document.id,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.label(),
                    error = %e.message,
                    "Content push failed"
                );
            }
        }

        result
    }
}
