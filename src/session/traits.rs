//! Seams between the session and the outside world
//!
//! The transport carries requests to the chat proxy; the view is whatever
//! shows the transcript. Both have mock implementations for tests.

use super::state::TranscriptEntry;
use super::wire::{ProxyEnvelope, ProxyRequest};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a request never produced an envelope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("proxy answered with HTTP {0}")]
    Status(u16),
    #[error("could not decode proxy response: {0}")]
    Decode(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("request abandoned before an answer arrived")]
    Abandoned,
}

/// Carries one query to the chat proxy
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn send(&self, request: &ProxyRequest) -> Result<ProxyEnvelope, TransportError>;
}

#[async_trait]
impl<T: QueryTransport + ?Sized> QueryTransport for Arc<T> {
    async fn send(&self, request: &ProxyRequest) -> Result<ProxyEnvelope, TransportError> {
        (**self).send(request).await
    }
}

/// Renders session output.
///
/// Implementations must show entry text literally; nothing in a message is
/// ever interpreted as markup or control sequences.
pub trait TranscriptView {
    fn set_open(&mut self, open: bool);

    fn focus_input(&mut self);

    fn clear_input(&mut self);

    /// Append an entry and scroll so it is visible
    fn append(&mut self, entry: &TranscriptEntry);

    fn show_pending(&mut self);

    fn hide_pending(&mut self);
}
