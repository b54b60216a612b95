//! Line-oriented view for terminals

use super::state::{Role, TranscriptEntry};
use super::traits::TranscriptView;
use crate::text::literal;
use std::io::Write;

const PENDING_TEXT: &str = "Thinking...";

/// Prints the transcript to a writer as it grows.
///
/// Output is suppressed while the window is closed; entries appended in the
/// meantime are printed when it opens again. Write errors are logged and
/// otherwise ignored, a broken terminal must not abort the session.
pub struct TerminalView<W: Write> {
    out: W,
    open: bool,
    backlog: Vec<TranscriptEntry>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            open: false,
            backlog: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn print_entry(&mut self, entry: &TranscriptEntry) {
        match entry {
            TranscriptEntry::Message(m) => {
                let label = match m.role {
                    Role::User => "you",
                    Role::Bot => "bot",
                };
                self.print(&format!("{label}> {}", literal(&m.text)));
            }
            TranscriptEntry::Thoughts { steps, .. } => {
                for step in steps {
                    self.print(&format!("      · {}", literal(&step.text)));
                }
            }
        }
    }
}

impl<W: Write> TranscriptView for TerminalView<W> {
    fn set_open(&mut self, open: bool) {
        self.open = open;
        if open {
            self.print("── Chat Assistant ──");
            for entry in std::mem::take(&mut self.backlog) {
                self.print_entry(&entry);
            }
        } else {
            self.print("── chat closed (/open to reopen) ──");
        }
    }

    // Input focus and clearing belong to the line editor
    fn focus_input(&mut self) {}

    fn clear_input(&mut self) {}

    fn append(&mut self, entry: &TranscriptEntry) {
        if self.open {
            self.print_entry(entry);
        } else {
            self.backlog.push(entry.clone());
        }
    }

    fn show_pending(&mut self) {
        if self.open {
            self.print(PENDING_TEXT);
        }
    }

    fn hide_pending(&mut self) {}
}
