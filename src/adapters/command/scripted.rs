//! Scripted command source for testing.
//!
//! Replays a fixed list of lines. Once they run out it either reports end of
//! input or, with [`ScriptedCommandSource::then_stall`], never answers again,
//! like an idle terminal.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::ports::{CommandSource, CommandSourceError};

#[derive(Debug, Default)]
pub struct ScriptedCommandSource {
    lines: VecDeque<String>,
    stall_when_empty: bool,
}

impl ScriptedCommandSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            stall_when_empty: false,
        }
    }

    /// Wait forever instead of reporting end of input.
    pub fn then_stall(mut self) -> Self {
        self.stall_when_empty = true;
        self
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl CommandSource for ScriptedCommandSource {
    async fn next_line(&mut self) -> Result<Option<String>, CommandSourceError> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None if self.stall_when_empty => std::future::pending().await,
            None => Ok(None),
        }
    }
}
