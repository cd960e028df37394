//! Stdout console - Prints operator lines with their category prefix.

use std::io::Write;

use crate::ports::{ConsoleLine, ConsoleSink, LineKind};

/// Writes each line to stdout as `<prefix> <text>`.
///
/// Diagnostics go through `tracing` to stderr, so stdout carries only what
/// the operator needs to read.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl StdoutConsole {
    pub fn new() -> Self {
        Self
    }
}

impl ConsoleSink for StdoutConsole {
    fn emit(&self, line: ConsoleLine) {
        if line.kind == LineKind::Warning {
            tracing::debug!(text = %line.text, "console warning");
        }
        let mut out = std::io::stdout().lock();
        // A closed stdout leaves nobody to tell.
        let _ = writeln!(out, "{}", line);
    }
}
