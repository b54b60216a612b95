//! Mock RAG backend for testing

use super::{ContentDocument, QueryRequest, RagBackend, RagError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Mock backend that answers queries from a queue and records everything
#[derive(Default)]
pub struct MockRagBackend {
    replies: Mutex<VecDeque<Result<Value, RagError>>>,
    fail_pushes: bool,
    /// Record of all queries received
    pub queries: Mutex<Vec<QueryRequest>>,
    /// Record of all content pushes received
    pub pushes: Mutex<Vec<ContentDocument>>,
    /// Notified after every content push (for awaiting detached tasks)
    pub pushed: Notify,
}

impl MockRagBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every content push fail
    pub fn failing_pushes() -> Self {
        Self {
            fail_pushes: true,
            ..Self::default()
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: Value) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue an error
    pub fn queue_error(&self, error: RagError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_queries(&self) -> Vec<QueryRequest> {
        self.queries.lock().unwrap().clone()
    }

    pub fn recorded_pushes(&self) -> Vec<ContentDocument> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RagBackend for MockRagBackend {
    async fn query(&self, request: &QueryRequest) -> Result<Value, RagError> {
        self.queries.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RagError::network("No mock reply queued")))
    }

    async fn push_content(&self, document: &ContentDocument) -> Result<(), RagError> {
        self.pushes.lock().unwrap().push(document.clone());
        self.pushed.notify_one();
        if self.fail_pushes {
            Err(RagError::status(500, "mock push failure"))
        } else {
            Ok(())
        }
    }
}
