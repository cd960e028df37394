//! ListenerRelay - Surfaces inbound chat seen by the listener client.
//!
//! Only the pool's designated listener is wired to the relay, so every
//! inbound message reaches the operator once no matter how many clients
//! are connected.

use std::sync::Arc;

use crate::domain::client::ChatObserver;
use crate::domain::foundation::Identity;
use crate::ports::{ConsoleLine, ConsoleSink};

/// What the relay did with one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayDecision {
    Relayed,
    /// The listener has not established its session yet.
    NotEstablished,
    /// The message was sent by the listener itself.
    SelfEcho,
}

pub struct ListenerRelay {
    console: Arc<dyn ConsoleSink>,
}

impl ListenerRelay {
    pub fn new(console: Arc<dyn ConsoleSink>) -> Self {
        Self { console }
    }

    pub fn relay(&self, own_identity: Option<&Identity>, sender: &str, message: &str) -> RelayDecision {
        let Some(own) = own_identity else {
            return RelayDecision::NotEstablished;
        };
        if own == sender {
            return RelayDecision::SelfEcho;
        }
        self.console.emit(ConsoleLine::chat(sender, message));
        RelayDecision::Relayed
    }
}

impl ChatObserver for ListenerRelay {
    fn on_chat(&self, own_identity: Option<&Identity>, sender: &str, message: &str) {
        let decision = self.relay(own_identity, sender, message);
        tracing::trace!(?decision, sender, "inbound chat");
    }
}
