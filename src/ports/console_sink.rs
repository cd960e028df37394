//! ConsoleSink port - Operator-facing output.
//!
//! Lines are categorized rather than free-form so adapters can render
//! them however suits the terminal, and tests can assert on category.

use std::fmt;

/// Category of an operator console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Program lifecycle announcements (startup, shutdown).
    Banner,
    /// Positive status events.
    Status,
    /// Warnings and per-client faults.
    Warning,
    /// Chat relayed from the listener client.
    Chat,
}

impl LineKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            LineKind::Banner => "*",
            LineKind::Status => "+",
            LineKind::Warning => "!",
            LineKind::Chat => "[CHAT]",
        }
    }
}

/// One line of operator output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub kind: LineKind,
    pub text: String,
}

impl ConsoleLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn banner(text: impl Into<String>) -> Self {
        Self::new(LineKind::Banner, text)
    }

    pub fn status(text: impl Into<String>) -> Self {
        Self::new(LineKind::Status, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(LineKind::Warning, text)
    }

    /// Relayed chat, rendered as `sender -> message`.
    pub fn chat(sender: &str, message: &str) -> Self {
        Self::new(LineKind::Chat, format!("{} -> {}", sender, message))
    }
}

impl fmt::Display for ConsoleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.prefix(), self.text)
    }
}

/// Port for writing operator console lines.
///
/// Implementations must not block for long: clients emit lines from their
/// event loops while holding their own state lock.
pub trait ConsoleSink: Send + Sync {
    fn emit(&self, line: ConsoleLine);
}
