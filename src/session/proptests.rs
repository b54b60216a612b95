//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::effect::{Effect, Settlement};
use super::event::SessionEvent;
use super::state::*;
use super::traits::TransportError;
use super::transition::*;
use super::wire::ProxyEnvelope;
use proptest::prelude::*;
use serde_json::json;
use std::time::Duration;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,8}"
}

fn arb_text() -> impl Strategy<Value = String> {
    "[ ]{0,2}[a-zA-Z0-9?<>&]{1,20}[ ]{0,2}"
}

fn arb_good_envelope() -> impl Strategy<Value = ProxyEnvelope> {
    (
        "[a-zA-Z0-9 .]{0,30}",
        proptest::collection::vec("[a-z ]{1,12}", 0..4),
    )
        .prop_map(|(response, thoughts)| {
            ProxyEnvelope::success(json!({
                "response": response,
                "thought_process": thoughts
            }))
        })
}

fn arb_bad_envelope() -> impl Strategy<Value = ProxyEnvelope> {
    prop_oneof![
        Just(ProxyEnvelope::default()),
        Just(ProxyEnvelope::error("Error processing query")),
        Just(ProxyEnvelope::success(serde_json::Value::Null)),
        Just(ProxyEnvelope::success(json!({ "detail": "Internal Server Error" }))),
    ]
}

fn arb_transport_error() -> impl Strategy<Value = TransportError> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(TransportError::Network),
        (400u16..600).prop_map(TransportError::Status),
        "[a-z ]{1,20}".prop_map(TransportError::Decode),
        Just(TransportError::Timeout(Duration::from_secs(30))),
        Just(TransportError::Abandoned),
    ]
}

fn arb_event() -> impl Strategy<Value = SessionEvent> {
    prop_oneof![
        Just(SessionEvent::Toggle),
        arb_text().prop_map(|raw| SessionEvent::Submit { raw }),
        arb_blank().prop_map(|raw| SessionEvent::Submit { raw }),
        arb_good_envelope().prop_map(|envelope| SessionEvent::ReplyReceived { envelope }),
        arb_bad_envelope().prop_map(|envelope| SessionEvent::ReplyReceived { envelope }),
        arb_transport_error().prop_map(|error| SessionEvent::RequestFailed { error }),
    ]
}

/// A state reached by running a random event sequence from scratch
fn arb_state() -> impl Strategy<Value = SessionState> {
    proptest::collection::vec(arb_event(), 0..30).prop_map(|events| {
        let mut state = SessionState::new();
        for event in events {
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
        }
        state
    })
}

fn rendered_messages(effects: &[Effect]) -> Vec<&Message> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Render(TranscriptEntry::Message(m)) => Some(m),
            _ => None,
        })
        .collect()
}

fn settled_state(state: &SessionState) -> SessionState {
    let mut settled = state.clone();
    settled.phase = Phase::Idle;
    settled
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn context_never_exceeds_cap(state in arb_state()) {
        prop_assert!(state.context.len() <= MAX_CONTEXT_ENTRIES);
        prop_assert_eq!(state.context.len() % 2, 0);
    }

    #[test]
    fn blank_submit_changes_nothing(state in arb_state(), raw in arb_blank()) {
        let result = transition(&state, SessionEvent::Submit { raw }).unwrap();
        prop_assert_eq!(result.new_state, state);
        prop_assert!(result.effects.is_empty());
    }

    #[test]
    fn submit_from_idle_sends_exactly_once(state in arb_state(), raw in arb_text()) {
        let idle = settled_state(&state);
        let result = transition(&idle, SessionEvent::Submit { raw: raw.clone() }).unwrap();

        let sends: Vec<_> = result
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::SendQuery(request) => Some(request),
                _ => None,
            })
            .collect();
        prop_assert_eq!(sends.len(), 1);
        prop_assert_eq!(&sends[0].query, raw.trim());
        prop_assert_eq!(&sends[0].context, &idle.context.snapshot());
        prop_assert_eq!(result.effects.last(), Some(&Effect::SendQuery(sends[0].clone())));
        prop_assert!(result.new_state.is_sending());
    }

    #[test]
    fn good_reply_grows_context_by_one_exchange(
        state in arb_state(),
        raw in arb_text(),
        envelope in arb_good_envelope(),
    ) {
        let idle = settled_state(&state);
        let sending = transition(&idle, SessionEvent::Submit { raw: raw.clone() }).unwrap().new_state;
        let reply = envelope.reply().unwrap();
        let result = transition(&sending, SessionEvent::ReplyReceived { envelope }).unwrap();

        let mut expected = idle.context.snapshot();
        expected.push(raw.trim().to_string());
        expected.push(reply.response.clone());
        let start = expected.len().saturating_sub(MAX_CONTEXT_ENTRIES);
        prop_assert_eq!(result.new_state.context.snapshot(), expected[start..].to_vec());

        let messages = rendered_messages(&result.effects);
        prop_assert_eq!(messages.len(), 1);
        prop_assert_eq!(messages[0].role, Role::Bot);
        prop_assert_eq!(&messages[0].text, &reply.response);
        prop_assert_eq!(result.effects.first(), Some(&Effect::HidePending));
        prop_assert_eq!(result.effects.last(), Some(&Effect::Settle(Settlement::Answered)));
    }

    #[test]
    fn failures_leave_context_alone(
        state in arb_state(),
        raw in arb_text(),
        failure in prop_oneof![
            arb_bad_envelope().prop_map(|envelope| SessionEvent::ReplyReceived { envelope }),
            arb_transport_error().prop_map(|error| SessionEvent::RequestFailed { error }),
        ],
    ) {
        let idle = settled_state(&state);
        let sending = transition(&idle, SessionEvent::Submit { raw }).unwrap().new_state;
        let result = transition(&sending, failure).unwrap();

        prop_assert_eq!(&result.new_state.context, &idle.context);
        prop_assert_eq!(&result.new_state.phase, &Phase::Idle);
        let messages = rendered_messages(&result.effects);
        prop_assert_eq!(messages.len(), 1);
        prop_assert_eq!(messages[0].text.as_str(), FALLBACK_REPLY);
        prop_assert_eq!(result.effects.first(), Some(&Effect::HidePending));
    }

    #[test]
    fn display_order_strictly_increases(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::new();
        let mut last: Option<u64> = None;
        for event in events {
            let Ok(result) = transition(&state, event) else { continue };
            for effect in &result.effects {
                if let Effect::Render(entry) = effect {
                    let order = entry.display_order();
                    prop_assert!(last.map_or(true, |prev| order > prev));
                    last = Some(order);
                }
            }
            state = result.new_state;
        }
    }

    #[test]
    fn pending_indicator_is_balanced(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::new();
        let mut pending = false;
        for event in events {
            let Ok(result) = transition(&state, event) else { continue };
            for effect in &result.effects {
                match effect {
                    Effect::ShowPending => pending = true,
                    Effect::HidePending => pending = false,
                    _ => {}
                }
            }
            state = result.new_state;
            // Indicator is visible exactly while a request is outstanding
            prop_assert_eq!(pending, state.is_sending());
        }
    }

    #[test]
    fn toggle_only_flips_open(state in arb_state()) {
        let result = transition(&state, SessionEvent::Toggle).unwrap();
        let mut expected = state.clone();
        expected.is_open = !state.is_open;
        prop_assert_eq!(result.new_state, expected);
    }
}
