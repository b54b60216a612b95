//! Events that drive a chat session

use super::traits::TransportError;
use super::wire::ProxyEnvelope;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum SessionEvent {
    // User events
    Toggle,
    Submit { raw: String },

    // Transport events
    ReplyReceived { envelope: ProxyEnvelope },
    RequestFailed { error: TransportError },
}
