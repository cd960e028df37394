//! Mock session connector for testing.
//!
//! Provides a scriptable implementation of the `SessionConnector` port so
//! tests can drive client lifecycles without a network.
//!
//! # Features
//!
//! - Every opened session is reachable through a [`MockSessionHandle`]
//! - Handles emit session events on demand (spawn, kick, chat, ...)
//! - Sent payloads and disconnect attempts are recorded
//! - Send and disconnect failures can be injected per session
//!
//! # Example
//!
//! ```ignore
//! let connector = Arc::new(MockSessionConnector::new());
//! let pool = Pool::construct(&settings, &ctx, relay, &mut rng);
//!
//! connector.handle(0).unwrap().spawn();
//! pool.broadcast("hello");
//! assert_eq!(connector.handle(0).unwrap().sent(), vec!["hello"]);
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::ports::{
    Session, SessionConnector, SessionError, SessionEvent, SessionEvents, SessionRequest,
};

#[derive(Debug)]
struct MockSessionState {
    request: SessionRequest,
    events: mpsc::UnboundedSender<SessionEvent>,
    sent: Mutex<Vec<String>>,
    disconnects: AtomicUsize,
    closed: AtomicBool,
    fail_sends: AtomicBool,
    fail_disconnects: AtomicBool,
}

impl MockSessionState {
    fn emit(&self, event: SessionEvent) {
        if event == SessionEvent::Ended {
            self.closed.store(true, Ordering::SeqCst);
        }
        // The receiving pump may be gone in tests that never spawn one.
        let _ = self.events.send(event);
    }
}

/// Test-side handle onto one mock session.
#[derive(Debug, Clone)]
pub struct MockSessionHandle {
    state: Arc<MockSessionState>,
}

impl MockSessionHandle {
    /// The request the session was opened with.
    pub fn request(&self) -> SessionRequest {
        self.state.request.clone()
    }

    pub fn emit(&self, event: SessionEvent) {
        self.state.emit(event);
    }

    pub fn spawn(&self) {
        self.emit(SessionEvent::Spawned);
    }

    pub fn kick(&self, reason: &str) {
        self.emit(SessionEvent::Kicked {
            reason: reason.to_owned(),
        });
        self.emit(SessionEvent::Ended);
    }

    pub fn error(&self, message: &str) {
        self.emit(SessionEvent::Error {
            message: message.to_owned(),
        });
    }

    pub fn end(&self) {
        self.emit(SessionEvent::Ended);
    }

    pub fn chat(&self, sender: &str, message: &str) {
        self.emit(SessionEvent::Chat {
            sender: sender.to_owned(),
            message: message.to_owned(),
        });
    }

    /// Payloads accepted by `Session::send`, in order.
    pub fn sent(&self) -> Vec<String> {
        self.state
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `Session::disconnect` calls, failed ones included.
    pub fn disconnect_count(&self) -> usize {
        self.state.disconnects.load(Ordering::SeqCst)
    }

    pub fn fail_sends(&self, fail: bool) {
        self.state.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_disconnects(&self, fail: bool) {
        self.state.fail_disconnects.store(fail, Ordering::SeqCst);
    }
}

struct MockSession {
    state: Arc<MockSessionState>,
}

impl Session for MockSession {
    fn send(&self, payload: &str) -> Result<(), SessionError> {
        if self.state.fail_sends.load(Ordering::SeqCst) {
            return Err(SessionError::Transport("injected send failure".into()));
        }
        if self.state.closed.load(Ordering::SeqCst) {
            return Err(SessionError::Closed);
        }
        self.state
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.to_owned());
        Ok(())
    }

    fn disconnect(&self) -> Result<(), SessionError> {
        self.state.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_disconnects.load(Ordering::SeqCst) {
            return Err(SessionError::Transport("injected disconnect failure".into()));
        }
        if !self.state.closed.load(Ordering::SeqCst) {
            self.state.emit(SessionEvent::Ended);
        }
        Ok(())
    }
}

/// Connector that hands out mock sessions and keeps a handle to each.
#[derive(Debug, Default)]
pub struct MockSessionConnector {
    sessions: Mutex<Vec<MockSessionHandle>>,
}

impl MockSessionConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for the `n`th opened session (0-based, in open order).
    pub fn handle(&self, n: usize) -> Option<MockSessionHandle> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(n)
            .cloned()
    }

    pub fn handles(&self) -> Vec<MockSessionHandle> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn opened_count(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl SessionConnector for MockSessionConnector {
    fn open(&self, request: SessionRequest) -> (Box<dyn Session>, SessionEvents) {
        let (events, rx) = mpsc::unbounded_channel();
        let state = Arc::new(MockSessionState {
            request,
            events,
            sent: Mutex::new(Vec::new()),
            disconnects: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            fail_sends: AtomicBool::new(false),
            fail_disconnects: AtomicBool::new(false),
        });
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockSessionHandle {
                state: state.clone(),
            });
        (Box::new(MockSession { state }), rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Identity;

    fn request() -> SessionRequest {
        SessionRequest {
            host: "localhost".into(),
            port: 25565,
            identity: Identity::from_string("bot_ab12c"),
            protocol_version: "1.8.9".into(),
        }
    }

    #[tokio::test]
    async fn handle_events_arrive_on_the_stream() {
        let connector = MockSessionConnector::new();
        let (_session, mut events) = connector.open(request());
        let handle = connector.handle(0).unwrap();

        handle.spawn();
        handle.chat("Steve", "hi");

        assert_eq!(events.recv().await, Some(SessionEvent::Spawned));
        assert_eq!(
            events.recv().await,
            Some(SessionEvent::Chat {
                sender: "Steve".into(),
                message: "hi".into()
            })
        );
    }

    #[tokio::test]
    async fn disconnect_emits_ended_once_and_closes_session() {
        let connector = MockSessionConnector::new();
        let (session, mut events) = connector.open(request());

        session.disconnect().unwrap();
        session.disconnect().unwrap();

        assert_eq!(events.recv().await, Some(SessionEvent::Ended));
        assert!(events.try_recv().is_err());
        assert_eq!(session.send("late"), Err(SessionError::Closed));
        assert_eq!(connector.handle(0).unwrap().disconnect_count(), 2);
    }

    #[test]
    fn injected_failures_are_reported() {
        let connector = MockSessionConnector::new();
        let (session, _events) = connector.open(request());
        let handle = connector.handle(0).unwrap();

        handle.fail_sends(true);
        handle.fail_disconnects(true);

        assert!(matches!(session.send("x"), Err(SessionError::Transport(_))));
        assert!(session.disconnect().is_err());
        assert!(handle.sent().is_empty());
    }
}
