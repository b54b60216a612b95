//! RAG backend error types

use thiserror::Error;

/// Error talking to the RAG service, with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RagError {
    pub kind: RagErrorKind,
    pub message: String,
}

impl RagError {
    pub fn new(kind: RagErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(RagErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(RagErrorKind::Timeout, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(RagErrorKind::Status(code), message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(RagErrorKind::Decode, message)
    }

    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RagErrorKind {
    /// Connection refused, DNS failure, reset
    Network,
    /// Request exceeded the configured timeout
    Timeout,
    /// Service answered with a non-2xx status
    Status(u16),
    /// Body was not the JSON we expected
    Decode,
}

impl RagErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Status(_) => "status",
            Self::Decode => "decode",
        }
    }
}
