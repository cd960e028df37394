//! In-memory console for testing.
//!
//! Captures every emitted line so tests can assert on what the operator
//! would have seen.

use std::sync::{PoisonError, RwLock};

use crate::ports::{ConsoleLine, ConsoleSink, LineKind};

/// Console sink that records lines instead of printing them.
///
/// # Example
///
/// ```ignore
/// let console = Arc::new(InMemoryConsole::new());
/// relay.relay(Some(&identity), "Steve", "hi");
/// assert!(console.contains(LineKind::Chat, "Steve -> hi"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryConsole {
    lines: RwLock<Vec<ConsoleLine>>,
}

impl InMemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Returns all captured lines in emission order.
    pub fn lines(&self) -> Vec<ConsoleLine> {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns captured lines of one category.
    pub fn lines_of(&self, kind: LineKind) -> Vec<ConsoleLine> {
        self.lines()
            .into_iter()
            .filter(|line| line.kind == kind)
            .collect()
    }

    /// Counts captured lines of one category.
    pub fn count(&self, kind: LineKind) -> usize {
        self.lines_of(kind).len()
    }

    /// Checks whether any line of `kind` contains `needle`.
    pub fn contains(&self, kind: LineKind, needle: &str) -> bool {
        self.lines_of(kind)
            .iter()
            .any(|line| line.text.contains(needle))
    }

    /// Clears captured lines (for test isolation).
    pub fn clear(&self) {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ConsoleSink for InMemoryConsole {
    fn emit(&self, line: ConsoleLine) {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
    }
}
