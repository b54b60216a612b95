//! Effects produced by session transitions

use super::state::TranscriptEntry;
use super::wire::ProxyRequest;

/// How a submission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// A well-formed answer was shown and recorded in the context
    Answered,
    /// The fallback message was shown; context untouched
    Failed,
}

/// Effects to be executed after a state transition, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SetOpen(bool),
    FocusInput,
    ClearInput,
    /// Append to the transcript and scroll to it
    Render(TranscriptEntry),
    ShowPending,
    HidePending,
    /// Issue the one request for the current submission
    SendQuery(ProxyRequest),
    /// Record a failure for diagnostics; never shown to the user
    ReportFailure { detail: String },
    Settle(Settlement),
}
