//! CommandSource port - Where operator commands come from.

use async_trait::async_trait;

/// Errors raised while reading operator input.
#[derive(Debug, thiserror::Error)]
pub enum CommandSourceError {
    #[error("failed to read command: {0}")]
    Io(#[from] std::io::Error),
}

/// Line-oriented source of operator commands.
///
/// Lines are returned without their trailing newline. `Ok(None)` means the
/// input is exhausted and no further lines will arrive.
#[async_trait]
pub trait CommandSource: Send {
    async fn next_line(&mut self) -> Result<Option<String>, CommandSourceError>;
}
