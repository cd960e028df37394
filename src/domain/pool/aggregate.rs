//! Pool aggregate - The fixed set of clients and the operations that fan out
//! across them.
//!
//! The client vector is built once and never resized, so readers share it
//! without a lock. `clients[0]` is the listener.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::domain::client::{ChatObserver, Client, ClientContext, ClientRole, SendOutcome};
use crate::domain::foundation::ClientState;

use super::PoolSettings;

/// Per-broadcast delivery tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub deferred: usize,
    pub failed: usize,
}

impl BroadcastReport {
    pub fn total(&self) -> usize {
        self.sent + self.deferred + self.failed
    }
}

/// Snapshot of how many clients sit in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub connecting: usize,
    pub ready: usize,
    pub ended: usize,
}

/// Result of [`Pool::shutdown_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Clients whose disconnect was issued.
    pub requested: usize,
    /// Disconnect requests the session rejected.
    pub failed: usize,
    pub grace: Duration,
}

pub struct Pool {
    clients: Vec<Arc<Client>>,
    listener: Arc<Client>,
}

impl Pool {
    /// Creates `desired_count` clients with indices `1..=desired_count` and
    /// makes the first one the listener, wired to `relay`.
    ///
    /// Returns without waiting for any connection. Must be called from
    /// within a tokio runtime.
    pub fn construct<R: Rng + ?Sized>(
        settings: &PoolSettings,
        ctx: &ClientContext,
        relay: Arc<dyn ChatObserver>,
        rng: &mut R,
    ) -> Self {
        let count = settings.desired_count.get();
        let mut clients = Vec::with_capacity(count);
        for index in 1..=count {
            let role = if index == 1 {
                ClientRole::Listener(relay.clone())
            } else {
                ClientRole::Member
            };
            clients.push(Client::create(
                &settings.endpoint,
                &settings.base_name,
                &settings.protocol_version,
                index,
                role,
                rng,
                ctx,
            ));
        }

        let listener = clients[0].clone();
        tracing::info!(
            count,
            endpoint = %settings.endpoint,
            listener = %listener.identity(),
            "pool constructed"
        );
        Self { clients, listener }
    }

    pub fn clients(&self) -> &[Arc<Client>] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Always false; a pool holds at least one client.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// The client relaying inbound chat.
    pub fn listener(&self) -> &Arc<Client> {
        &self.listener
    }

    /// Offers `text` to every client. One client's failure never affects
    /// delivery to the others.
    pub fn broadcast(&self, text: &str) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for client in &self.clients {
            match client.try_send(text) {
                Ok(SendOutcome::Sent) => report.sent += 1,
                Ok(SendOutcome::Deferred { .. }) => report.deferred += 1,
                Err(_) => report.failed += 1,
            }
        }
        tracing::debug!(
            sent = report.sent,
            deferred = report.deferred,
            failed = report.failed,
            "broadcast complete"
        );
        report
    }

    /// Issues a disconnect to every client without waiting for any of them.
    /// Returns the number of rejected requests.
    pub fn disconnect_all(&self) -> usize {
        self.clients
            .iter()
            .filter(|client| !client.disconnect())
            .count()
    }

    /// Disconnects every client, then waits `grace` so teardown notices can
    /// reach the console.
    pub async fn shutdown_all(&self, grace: Duration) -> ShutdownReport {
        let failed = self.disconnect_all();
        tokio::time::sleep(grace).await;
        ShutdownReport {
            requested: self.clients.len(),
            failed,
            grace,
        }
    }

    pub fn state_counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for client in &self.clients {
            match client.state() {
                ClientState::Connecting => counts.connecting += 1,
                ClientState::Ready => counts.ready += 1,
                ClientState::Ended => counts.ended += 1,
            }
        }
        counts
    }
}
