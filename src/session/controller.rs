//! Chat session controller
//!
//! Owns the session state, feeds events through [`transition`] and executes
//! the resulting effects against a transport and a view.

use super::effect::{Effect, Settlement};
use super::event::SessionEvent;
use super::state::{Role, RollingContext, SessionState, TranscriptEntry};
use super::traits::{QueryTransport, TranscriptView, TransportError};
use super::transition::{transition, TransitionError};
use super::wire::ProxyRequest;
use std::time::Duration;
use tokio::time::timeout;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Upper bound on one round trip to the proxy
    pub request_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// What `submit` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; nothing sent, nothing rendered
    Ignored,
    Answered,
    Failed,
}

impl From<Settlement> for SubmitOutcome {
    fn from(settlement: Settlement) -> Self {
        match settlement {
            Settlement::Answered => SubmitOutcome::Answered,
            Settlement::Failed => SubmitOutcome::Failed,
        }
    }
}

/// One chat session for one page (or terminal)
pub struct ChatSession<T, V> {
    transport: T,
    view: V,
    config: SessionConfig,
    state: SessionState,
    session_id: String,
}

impl<T: QueryTransport, V: TranscriptView> ChatSession<T, V> {
    pub fn new(transport: T, view: V, config: SessionConfig) -> Self {
        Self {
            transport,
            view,
            config,
            state: SessionState::new(),
            session_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn context(&self) -> &RollingContext {
        &self.state.context
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Open or close the chat window
    pub fn toggle(&mut self) {
        // Toggle is accepted in every phase
        if let Err(e) = self.dispatch(SessionEvent::Toggle) {
            tracing::warn!(session_id = %self.session_id, error = %e, "Toggle rejected");
        }
    }

    /// Send one user message and wait for the answer to be rendered.
    ///
    /// Fails only with [`TransitionError::Busy`] when another submission is
    /// still outstanding; transport problems are shown to the user as the
    /// fallback reply and reported as [`SubmitOutcome::Failed`].
    pub async fn submit(&mut self, raw: &str) -> Result<SubmitOutcome, TransitionError> {
        let dispatched = self.dispatch(SessionEvent::Submit {
            raw: raw.to_string(),
        })?;
        let Some(request) = dispatched.request else {
            return Ok(SubmitOutcome::Ignored);
        };

        tracing::debug!(
            session_id = %self.session_id,
            query_len = request.query.len(),
            context_len = request.context.len(),
            "Sending chat query"
        );

        // Settles the session as failed if this future is dropped mid-request
        let Self {
            transport,
            view,
            config,
            state,
            session_id,
        } = self;
        let in_flight = InFlight {
            state,
            view,
            session_id: session_id.as_str(),
            armed: true,
        };

        let event = match timeout(config.request_timeout, transport.send(&request)).await {
            Ok(Ok(envelope)) => SessionEvent::ReplyReceived { envelope },
            Ok(Err(error)) => SessionEvent::RequestFailed { error },
            Err(_) => SessionEvent::RequestFailed {
                error: TransportError::Timeout(config.request_timeout),
            },
        };

        let settled = in_flight.settle(event)?;
        Ok(settled.settlement.map_or(SubmitOutcome::Failed, SubmitOutcome::from))
    }

    /// Append a message to the transcript outside the request cycle
    pub fn render_message(&mut self, text: impl Into<String>, role: Role) {
        let message = self.state.next_message(text, role);
        self.view.append(&TranscriptEntry::Message(message));
    }

    /// Append a block of reasoning steps after the latest message
    pub fn render_thought_process(&mut self, steps: &[String]) {
        let entry = self.state.next_thoughts(steps);
        self.view.append(&entry);
    }

    fn dispatch(&mut self, event: SessionEvent) -> Result<Dispatched, TransitionError> {
        apply(&mut self.state, &mut self.view, &self.session_id, event)
    }
}

/// Run one event through the state machine and execute its effects
fn apply<V: TranscriptView>(
    state: &mut SessionState,
    view: &mut V,
    session_id: &str,
    event: SessionEvent,
) -> Result<Dispatched, TransitionError> {
    let result = transition(state, event)?;
    *state = result.new_state;

    let mut dispatched = Dispatched::default();
    for effect in result.effects {
        match effect {
            Effect::SetOpen(open) => view.set_open(open),
            Effect::FocusInput => view.focus_input(),
            Effect::ClearInput => view.clear_input(),
            Effect::Render(entry) => view.append(&entry),
            Effect::ShowPending => view.show_pending(),
            Effect::HidePending => view.hide_pending(),
            Effect::SendQuery(request) => dispatched.request = Some(request),
            Effect::ReportFailure { detail } => {
                tracing::error!(session_id = %session_id, error = %detail, "Chat request failed");
            }
            Effect::Settle(settlement) => dispatched.settlement = Some(settlement),
        }
    }
    Ok(dispatched)
}

/// Session borrowed for the duration of one request.
///
/// Dropping it unsettled feeds [`TransportError::Abandoned`] through the
/// state machine so the session returns to idle with the pending indicator
/// hidden.
struct InFlight<'a, V: TranscriptView> {
    state: &'a mut SessionState,
    view: &'a mut V,
    session_id: &'a str,
    armed: bool,
}

impl<V: TranscriptView> InFlight<'_, V> {
    fn settle(mut self, event: SessionEvent) -> Result<Dispatched, TransitionError> {
        self.armed = false;
        apply(self.state, self.view, self.session_id, event)
    }
}

impl<V: TranscriptView> Drop for InFlight<'_, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!(session_id = %self.session_id, "Chat request abandoned before settling");
        let event = SessionEvent::RequestFailed {
            error: TransportError::Abandoned,
        };
        if let Err(e) = apply(self.state, self.view, self.session_id, event) {
            tracing::warn!(session_id = %self.session_id, error = %e, "Could not settle abandoned request");
        }
    }
}

/// Effects the controller has to act on after the view is updated
#[derive(Default)]
struct Dispatched {
    request: Option<ProxyRequest>,
    settlement: Option<Settlement>,
}
