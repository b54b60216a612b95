//! Chat session state types

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Most recent context entries sent with a query (three exchanges)
pub const MAX_CONTEXT_ENTRIES: usize = 6;

/// Shown in place of an answer whenever a request fails for any reason
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error processing your request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

/// One conversational line in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub role: Role,
    pub display_order: u64,
}

/// One line of the reasoning trace attached to a bot message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThoughtStep {
    pub text: String,
}

/// Something appended to the visible transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptEntry {
    Message(Message),
    Thoughts {
        display_order: u64,
        steps: Vec<ThoughtStep>,
    },
}

impl TranscriptEntry {
    pub fn display_order(&self) -> u64 {
        match self {
            TranscriptEntry::Message(m) => m.display_order,
            TranscriptEntry::Thoughts { display_order, .. } => *display_order,
        }
    }
}

/// Bounded history of recent turns, alternating user and bot text.
///
/// Never holds more than [`MAX_CONTEXT_ENTRIES`]; the oldest entries are
/// dropped first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollingContext {
    entries: VecDeque<String>,
}

impl RollingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange, evicting the oldest entries past the cap
    pub fn push_exchange(&mut self, user: impl Into<String>, bot: impl Into<String>) {
        self.entries.push_back(user.into());
        self.entries.push_back(bot.into());
        while self.entries.len() > MAX_CONTEXT_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Request lifecycle of the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// One request is in flight for this (trimmed) query
    Sending { query: String },
}

/// Complete state of a chat session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub is_open: bool,
    pub phase: Phase,
    pub context: RollingContext,
    next_order: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.phase, Phase::Sending { .. })
    }

    /// Number of transcript entries created so far
    pub fn entries_created(&self) -> u64 {
        self.next_order
    }

    /// Create the next message in display order
    pub fn next_message(&mut self, text: impl Into<String>, role: Role) -> Message {
        Message {
            text: text.into(),
            role,
            display_order: self.bump_order(),
        }
    }

    /// Create the next thought block in display order
    pub fn next_thoughts(&mut self, steps: &[String]) -> TranscriptEntry {
        TranscriptEntry::Thoughts {
            display_order: self.bump_order(),
            steps: steps
                .iter()
                .map(|text| ThoughtStep { text: text.clone() })
                .collect(),
        }
    }

    fn bump_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }
}
