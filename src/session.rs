//! Chat session controller
//!
//! Implements the Elm Architecture pattern: a pure [`transition`] function
//! decides what happens, [`ChatSession`] carries it out against a
//! [`QueryTransport`] and a [`TranscriptView`].
//!
//! Per submission the session moves `Idle → Sending → Idle`. A second
//! submission while one is in flight is rejected, and every request is
//! bounded by a timeout, so the pending indicator can never be left behind.

mod controller;
mod effect;
pub mod event;
mod http;
pub mod state;
mod terminal;
mod traits;
pub(crate) mod transition;
mod wire;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub mod testing;

pub use controller::{ChatSession, SessionConfig, SubmitOutcome};
pub use effect::{Effect, Settlement};
pub use event::SessionEvent;
pub use http::HttpTransport;
pub use state::{
    Message, Phase, Role, RollingContext, SessionState, ThoughtStep, TranscriptEntry,
    FALLBACK_REPLY, MAX_CONTEXT_ENTRIES,
};
pub use terminal::TerminalView;
pub use traits::{QueryTransport, TranscriptView, TransportError};
pub use transition::{transition, TransitionError};
pub use wire::{ProxyEnvelope, ProxyRequest, QueryReply, WidgetConfig};
