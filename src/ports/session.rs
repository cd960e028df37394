//! Session port - Interface to one live connection against the remote endpoint.
//!
//! The pool never speaks the remote protocol itself. A [`SessionConnector`]
//! opens sessions, each returning a [`Session`] handle for outbound traffic
//! and a stream of [`SessionEvent`]s for everything the endpoint reports.
//!
//! ## Event contract
//!
//! - At most one `Spawned` per session.
//! - `Ended` eventually follows every terminal outcome (kick, transport
//!   error, graceful disconnect) and is the last event on the stream.
//! - `Error` is informational; it does not end the session by itself.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::foundation::Identity;

/// Everything a connector needs to open one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub host: String,
    pub port: u16,
    pub identity: Identity,
    pub protocol_version: String,
}

/// Lifecycle and inbound events emitted by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The endpoint confirmed the client fully joined.
    Spawned,
    /// The endpoint forcibly disconnected the client.
    Kicked { reason: String },
    /// Protocol or transport fault.
    Error { message: String },
    /// The connection is closed for good.
    Ended,
    /// Inbound chat line from some participant.
    Chat { sender: String, message: String },
}

impl SessionEvent {
    /// Invokes the matching handler method.
    pub fn dispatch(self, handler: &dyn SessionEventHandler) {
        match self {
            SessionEvent::Spawned => handler.on_spawned(),
            SessionEvent::Kicked { reason } => handler.on_kicked(&reason),
            SessionEvent::Error { message } => handler.on_error(&message),
            SessionEvent::Ended => handler.on_ended(),
            SessionEvent::Chat { sender, message } => handler.on_chat(&sender, &message),
        }
    }
}

/// Receiving half of a session's event stream.
pub type SessionEvents = mpsc::UnboundedReceiver<SessionEvent>;

/// Errors that can occur on a session handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session is no longer connected.
    #[error("session is closed")]
    Closed,

    /// The transport rejected the operation.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Outbound half of a live session.
///
/// Both methods must return without waiting on the network: adapters queue
/// the work for their own I/O task. Callers rely on this to invoke `send`
/// while holding per-client locks.
pub trait Session: Send + Sync {
    /// Queue one payload for transmission.
    fn send(&self, payload: &str) -> Result<(), SessionError>;

    /// Request teardown. Calling it on an already closed session is allowed.
    fn disconnect(&self) -> Result<(), SessionError>;
}

/// Port for opening sessions against the remote endpoint.
///
/// # Example
///
/// ```ignore
/// let (session, mut events) = connector.open(request);
/// while let Some(event) = events.recv().await {
///     event.dispatch(handler.as_ref());
/// }
/// ```
pub trait SessionConnector: Send + Sync {
    /// Begin connecting. Returns immediately; progress arrives as events.
    ///
    /// Must be called from within a tokio runtime.
    fn open(&self, request: SessionRequest) -> (Box<dyn Session>, SessionEvents);
}

/// Typed callback surface a session's events are delivered through.
pub trait SessionEventHandler: Send + Sync {
    fn on_spawned(&self);
    fn on_kicked(&self, reason: &str);
    fn on_error(&self, message: &str);
    fn on_ended(&self);
    fn on_chat(&self, sender: &str, message: &str);
}

/// Delivers every event on `events` to `handler`, in order, until the
/// stream closes.
pub async fn pump_events(mut events: SessionEvents, handler: Arc<dyn SessionEventHandler>) {
    while let Some(event) = events.recv().await {
        event.dispatch(handler.as_ref());
    }
}
