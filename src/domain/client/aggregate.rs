//! Client aggregate - One pooled connection and its readiness state.
//!
//! A client owns exactly one session. Its state and deferred-send queue sit
//! behind a per-client mutex; every mutation happens either on the client's
//! own event pump (session callbacks) or in [`Client::try_send`].
//!
//! Payloads offered while `Connecting` are queued and flushed, in order and
//! exactly once, inside the same critical section that moves the client to
//! `Ready`. Because [`Session::send`] never waits on the network, holding the
//! lock across it keeps per-client ordering intact when a broadcast races
//! with readiness.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use tokio::sync::watch;

use crate::domain::foundation::{BaseName, ClientState, FaultKind, Identity, StateMachine};
use crate::domain::pool::Endpoint;
use crate::ports::{
    pump_events, ConsoleLine, ConsoleSink, Session, SessionConnector, SessionEventHandler,
    SessionRequest,
};

use super::{SendError, SendOutcome};

/// Receives inbound chat seen by a client.
///
/// `own_identity` is `None` until the client has spawned at least once.
pub trait ChatObserver: Send + Sync {
    fn on_chat(&self, own_identity: Option<&Identity>, sender: &str, message: &str);
}

/// Responsibility a client takes on inside the pool.
#[derive(Clone, Default)]
pub enum ClientRole {
    #[default]
    Member,
    /// Forwards inbound chat to the observer.
    Listener(Arc<dyn ChatObserver>),
}

/// Shared collaborators every client is built with.
#[derive(Clone)]
pub struct ClientContext {
    pub connector: Arc<dyn SessionConnector>,
    pub console: Arc<dyn ConsoleSink>,
}

/// Human-readable handle used in every log line about a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientLabel {
    pub index: usize,
    pub identity: Identity,
}

impl fmt::Display for ClientLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client #{} ({})", self.index, self.identity)
    }
}

struct ClientInner {
    state: ClientState,
    spawned: bool,
    pending: VecDeque<String>,
}

pub struct Client {
    label: ClientLabel,
    session: Box<dyn Session>,
    inner: Mutex<ClientInner>,
    state_tx: watch::Sender<ClientState>,
    console: Arc<dyn ConsoleSink>,
    chat_observer: Option<Arc<dyn ChatObserver>>,
}

impl Client {
    /// Generates an identity, opens the session, and starts the client's
    /// event pump. Returns immediately in `Connecting`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn create<R: Rng + ?Sized>(
        endpoint: &Endpoint,
        base_name: &BaseName,
        protocol_version: &str,
        index: usize,
        role: ClientRole,
        rng: &mut R,
        ctx: &ClientContext,
    ) -> Arc<Self> {
        let identity = Identity::generate(base_name, rng);
        let (session, events) = ctx.connector.open(SessionRequest {
            host: endpoint.host.clone(),
            port: endpoint.port,
            identity: identity.clone(),
            protocol_version: protocol_version.to_owned(),
        });

        let client = Arc::new(Self::with_session(
            ClientLabel { index, identity },
            session,
            role,
            ctx.console.clone(),
        ));

        tracing::debug!(client = index, identity = %client.identity(), "session opened");
        tokio::spawn(pump_events(events, client.clone()));
        client
    }

    fn with_session(
        label: ClientLabel,
        session: Box<dyn Session>,
        role: ClientRole,
        console: Arc<dyn ConsoleSink>,
    ) -> Self {
        let (state_tx, _) = watch::channel(ClientState::Connecting);
        let chat_observer = match role {
            ClientRole::Member => None,
            ClientRole::Listener(observer) => Some(observer),
        };
        Self {
            label,
            session,
            inner: Mutex::new(ClientInner {
                state: ClientState::Connecting,
                spawned: false,
                pending: VecDeque::new(),
            }),
            state_tx,
            console,
            chat_observer,
        }
    }

    pub fn index(&self) -> usize {
        self.label.index
    }

    pub fn identity(&self) -> &Identity {
        &self.label.identity
    }

    pub fn label(&self) -> &ClientLabel {
        &self.label
    }

    pub fn state(&self) -> ClientState {
        self.lock().state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ClientState::Ready
    }

    pub fn is_listener(&self) -> bool {
        self.chat_observer.is_some()
    }

    /// Number of payloads waiting for readiness.
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// The identity once the session has been established, `None` before.
    pub fn established_identity(&self) -> Option<&Identity> {
        if self.lock().spawned {
            Some(&self.label.identity)
        } else {
            None
        }
    }

    /// Watch channel that follows every state change.
    ///
    /// When it reports `Ready`, all payloads deferred before readiness have
    /// already been handed to the session.
    pub fn subscribe_state(&self) -> watch::Receiver<ClientState> {
        self.state_tx.subscribe()
    }

    /// Sends now if ready, queues if connecting, refuses if ended.
    pub fn try_send(&self, payload: &str) -> Result<SendOutcome, SendError> {
        let mut inner = self.lock();
        match inner.state {
            ClientState::Ready => match self.session.send(payload) {
                Ok(()) => Ok(SendOutcome::Sent),
                Err(err) => {
                    self.fault(FaultKind::Send, format!("failed to send: {}", err));
                    Err(SendError::Session(err))
                }
            },
            ClientState::Connecting => {
                inner.pending.push_back(payload.to_owned());
                tracing::trace!(
                    client = self.label.index,
                    queued = inner.pending.len(),
                    "payload deferred until ready"
                );
                Ok(SendOutcome::Deferred {
                    queued: inner.pending.len(),
                })
            }
            ClientState::Ended => {
                tracing::debug!(client = self.label.index, "dropping payload for ended client");
                Err(SendError::Ended)
            }
        }
    }

    /// Requests session teardown. Failures are reported and swallowed.
    ///
    /// Returns `true` if the session accepted the request.
    pub fn disconnect(&self) -> bool {
        match self.session.disconnect() {
            Ok(()) => {
                tracing::debug!(client = self.label.index, "disconnect requested");
                true
            }
            Err(err) => {
                self.fault(FaultKind::Shutdown, format!("failed to disconnect: {}", err));
                false
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClientInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fault(&self, kind: FaultKind, cause: String) {
        tracing::debug!(client = self.label.index, kind = %kind, "{}", cause);
        self.console
            .emit(ConsoleLine::warning(format!("{} {}", self.label, cause)));
    }

    /// Moves to `Ended` unless already there. Returns the number of deferred
    /// payloads that were discarded, or `None` if nothing changed.
    fn end(inner: &mut ClientInner) -> Option<usize> {
        let next = inner.state.transition_to(ClientState::Ended).ok()?;
        inner.state = next;
        let discarded = inner.pending.len();
        inner.pending.clear();
        Some(discarded)
    }
}

impl SessionEventHandler for Client {
    fn on_spawned(&self) {
        let mut inner = self.lock();
        let Ok(next) = inner.state.transition_to(ClientState::Ready) else {
            tracing::debug!(client = self.label.index, state = %inner.state, "ignoring spawn");
            return;
        };
        inner.state = next;
        inner.spawned = true;
        self.console
            .emit(ConsoleLine::status(format!("{} spawned", self.label)));

        while let Some(payload) = inner.pending.pop_front() {
            if let Err(err) = self.session.send(&payload) {
                self.fault(
                    FaultKind::Send,
                    format!("failed to send after spawn: {}", err),
                );
            }
        }
        self.state_tx.send_replace(inner.state);
    }

    fn on_kicked(&self, reason: &str) {
        let mut inner = self.lock();
        match Self::end(&mut inner) {
            Some(_) => {
                self.fault(FaultKind::Connection, format!("kicked: {}", reason));
                self.state_tx.send_replace(inner.state);
            }
            None => tracing::debug!(client = self.label.index, reason, "kicked after end"),
        }
    }

    fn on_error(&self, message: &str) {
        self.fault(FaultKind::Connection, format!("error: {}", message));
    }

    fn on_ended(&self) {
        let mut inner = self.lock();
        match Self::end(&mut inner) {
            Some(0) => self.fault(FaultKind::Connection, "disconnected".to_owned()),
            Some(discarded) => self.fault(
                FaultKind::Connection,
                format!(
                    "disconnected; {} deferred message(s) dropped",
                    discarded
                ),
            ),
            None => return,
        }
        self.state_tx.send_replace(inner.state);
    }

    fn on_chat(&self, sender: &str, message: &str) {
        let Some(observer) = &self.chat_observer else {
            return;
        };
        observer.on_chat(self.established_identity(), sender, message);
    }
}
