//! Mock transport and recording view for testing

use super::state::{Role, TranscriptEntry};
use super::traits::{QueryTransport, TranscriptView, TransportError};
use super::wire::{ProxyEnvelope, ProxyRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Recording View
// ============================================================================

/// One call made on the view. Appends are flattened to `role: text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOp {
    SetOpen(bool),
    FocusInput,
    ClearInput,
    Append(String),
    ShowPending,
    HidePending,
}

#[derive(Debug, Default)]
pub struct ViewLog {
    pub ops: Vec<ViewOp>,
    pub entries: Vec<TranscriptEntry>,
    pub pending: bool,
}

/// View that records every call; the log is shared so a transport can
/// inspect it mid-request
#[derive(Default)]
pub struct RecordingView {
    log: Arc<Mutex<ViewLog>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Arc<Mutex<ViewLog>> {
        self.log.clone()
    }

    pub fn ops(&self) -> Vec<ViewOp> {
        self.log.lock().unwrap().ops.clone()
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.log.lock().unwrap().entries.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.log.lock().unwrap().pending
    }

    /// Transcript flattened to one line per message or thought step
    pub fn transcript_lines(&self) -> Vec<String> {
        self.entries().iter().flat_map(entry_lines).collect()
    }

    fn record(&mut self, op: ViewOp) {
        self.log.lock().unwrap().ops.push(op);
    }
}

fn entry_lines(entry: &TranscriptEntry) -> Vec<String> {
    match entry {
        TranscriptEntry::Message(m) => {
            let role = match m.role {
                Role::User => "user",
                Role::Bot => "bot",
            };
            vec![format!("{role}: {}", m.text)]
        }
        TranscriptEntry::Thoughts { steps, .. } => steps
            .iter()
            .map(|s| format!("thought: {}", s.text))
            .collect(),
    }
}

impl TranscriptView for RecordingView {
    fn set_open(&mut self, open: bool) {
        self.record(ViewOp::SetOpen(open));
    }

    fn focus_input(&mut self) {
        self.record(ViewOp::FocusInput);
    }

    fn clear_input(&mut self) {
        self.record(ViewOp::ClearInput);
    }

    fn append(&mut self, entry: &TranscriptEntry) {
        let mut log = self.log.lock().unwrap();
        for line in entry_lines(entry) {
            log.ops.push(ViewOp::Append(line));
        }
        log.entries.push(entry.clone());
    }

    fn show_pending(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.pending = true;
        log.ops.push(ViewOp::ShowPending);
    }

    fn hide_pending(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.pending = false;
        log.ops.push(ViewOp::HidePending);
    }
}

// ============================================================================
// Mock Transport
// ============================================================================

/// Mock transport that returns queued envelopes
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<ProxyEnvelope, TransportError>>>,
    delay: Option<Duration>,
    observed: Mutex<Option<Arc<Mutex<ViewLog>>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<ProxyRequest>>,
    /// Whether the observed view showed the pending indicator at send time
    pub pending_at_send: Mutex<Vec<bool>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that sleeps before answering (for timeout testing)
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Watch a view's log while requests are in flight
    pub fn observe(&self, log: Arc<Mutex<ViewLog>>) {
        *self.observed.lock().unwrap() = Some(log);
    }

    pub fn queue_envelope(&self, envelope: ProxyEnvelope) {
        self.replies.lock().unwrap().push_back(Ok(envelope));
    }

    pub fn queue_error(&self, error: TransportError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<ProxyRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn pending_seen(&self) -> Vec<bool> {
        self.pending_at_send.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryTransport for MockTransport {
    async fn send(&self, request: &ProxyRequest) -> Result<ProxyEnvelope, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let observed = self.observed.lock().unwrap().clone();
        if let Some(log) = observed {
            let pending = log.lock().unwrap().pending;
            self.pending_at_send.lock().unwrap().push(pending);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("No mock envelope queued".to_string())))
    }
}
