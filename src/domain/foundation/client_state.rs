//! ClientState enum for tracking the readiness lifecycle of a pooled client.

use std::fmt;

use super::StateMachine;

/// Readiness status of a single pooled client.
///
/// ```text
/// Connecting ──> Ready ──> Ended
///      └──────────────────────^
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientState {
    #[default]
    Connecting,
    Ready,
    Ended,
}

impl StateMachine for ClientState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ClientState::*;
        matches!(
            (self, target),
            (Connecting, Ready) | (Connecting, Ended) | (Ready, Ended)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ClientState::*;
        match self {
            Connecting => vec![Ready, Ended],
            Ready => vec![Ended],
            Ended => vec![],
        }
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClientState::Connecting => "connecting",
            ClientState::Ready => "ready",
            ClientState::Ended => "ended",
        };
        write!(f, "{}", s)
    }
}
