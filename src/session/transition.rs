//! Pure state transition function
//!
//! Given the same state and event this always yields the same new state and
//! effects; all I/O happens in the controller that executes the effects.

use super::effect::{Effect, Settlement};
use super::event::SessionEvent;
use super::state::{Phase, Role, SessionState, TranscriptEntry, FALLBACK_REPLY};
use super::wire::{ProxyEnvelope, ProxyRequest};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("A request is already in flight, wait for it to finish")]
    Busy,
    #[error("Received a reply while no request was in flight")]
    UnexpectedReply,
}

pub fn transition(
    state: &SessionState,
    event: SessionEvent,
) -> Result<TransitionResult, TransitionError> {
    match (&state.phase, event) {
        // Open/close is allowed in any phase and touches nothing else
        (_, SessionEvent::Toggle) => {
            let mut next = state.clone();
            next.is_open = !state.is_open;
            let result = TransitionResult::new(next).with_effect(Effect::SetOpen(!state.is_open));
            if state.is_open {
                Ok(result)
            } else {
                Ok(result.with_effect(Effect::FocusInput))
            }
        }

        // Blank input is ignored whatever the phase
        (_, SessionEvent::Submit { raw }) if raw.trim().is_empty() => {
            Ok(TransitionResult::new(state.clone()))
        }

        (Phase::Idle, SessionEvent::Submit { raw }) => {
            let query = raw.trim().to_string();
            let mut next = state.clone();
            let user = next.next_message(query.clone(), Role::User);
            let request = ProxyRequest {
                query: query.clone(),
                context: state.context.snapshot(),
            };
            next.phase = Phase::Sending { query };

            Ok(TransitionResult::new(next).with_effects([
                Effect::ClearInput,
                Effect::Render(TranscriptEntry::Message(user)),
                Effect::ShowPending,
                Effect::SendQuery(request),
            ]))
        }

        (Phase::Sending { .. }, SessionEvent::Submit { .. }) => Err(TransitionError::Busy),

        (Phase::Sending { query }, SessionEvent::ReplyReceived { envelope }) => {
            Ok(settle_reply(state, query, &envelope))
        }

        (Phase::Sending { .. }, SessionEvent::RequestFailed { error }) => Ok(settle_failure(
            state,
            format!("Chat request failed: {error}"),
        )),

        (Phase::Idle, SessionEvent::ReplyReceived { .. } | SessionEvent::RequestFailed { .. }) => {
            Err(TransitionError::UnexpectedReply)
        }
    }
}

fn settle_reply(state: &SessionState, query: &str, envelope: &ProxyEnvelope) -> TransitionResult {
    let Some(reply) = envelope.reply() else {
        return settle_failure(state, "Proxy returned a malformed or unsuccessful envelope".to_string());
    };

    let mut next = state.clone();
    next.phase = Phase::Idle;
    let bot = next.next_message(reply.response.clone(), Role::Bot);
    let thoughts = (!reply.thoughts().is_empty()).then(|| next.next_thoughts(reply.thoughts()));
    next.context.push_exchange(query, reply.response);

    TransitionResult::new(next)
        .with_effect(Effect::HidePending)
        .with_effect(Effect::Render(TranscriptEntry::Message(bot)))
        .with_effects(thoughts.map(Effect::Render))
        .with_effect(Effect::Settle(Settlement::Answered))
}

fn settle_failure(state: &SessionState, detail: String) -> TransitionResult {
    let mut next = state.clone();
    next.phase = Phase::Idle;
    let fallback = next.next_message(FALLBACK_REPLY, Role::Bot);

    TransitionResult::new(next).with_effects([
        Effect::HidePending,
        Effect::Render(TranscriptEntry::Message(fallback)),
        Effect::ReportFailure { detail },
        Effect::Settle(Settlement::Failed),
    ])
}
