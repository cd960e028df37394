//! Outcomes of handing a payload to a client.

use thiserror::Error;

use crate::ports::SessionError;

/// Successful result of [`Client::try_send`](super::Client::try_send).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Forwarded to the session immediately.
    Sent,
    /// Held until the client becomes ready; `queued` counts pending payloads
    /// including this one.
    Deferred { queued: usize },
}

/// Why a payload was not delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("client has ended")]
    Ended,

    #[error("session rejected payload: {0}")]
    Session(#[from] SessionError),
}
