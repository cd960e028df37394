//! Dispatcher - Turns one operator line into one pool broadcast.

use std::sync::Arc;

use crate::domain::pool::{BroadcastReport, Pool};
use crate::ports::{ConsoleLine, ConsoleSink};

/// Result of dispatching one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    Broadcast {
        report: BroadcastReport,
        /// Whether the listener sent the text a second time.
        mirrored: bool,
    },
}

pub struct Dispatcher {
    pool: Arc<Pool>,
    console: Arc<dyn ConsoleSink>,
    mirror_to_listener: bool,
}

impl Dispatcher {
    pub fn new(pool: Arc<Pool>, console: Arc<dyn ConsoleSink>) -> Self {
        Self {
            pool,
            console,
            mirror_to_listener: false,
        }
    }

    /// Also send each command straight through a ready listener, after the
    /// broadcast. The listener then says it twice.
    pub fn with_mirror_to_listener(mut self, enabled: bool) -> Self {
        self.mirror_to_listener = enabled;
        self
    }

    /// Broadcasts `line` verbatim unless it is blank.
    pub fn dispatch(&self, line: &str) -> DispatchOutcome {
        if line.trim().is_empty() {
            return DispatchOutcome::Ignored;
        }

        self.console.emit(ConsoleLine::status(format!(
            "sending \"{}\" to all {} clients",
            line,
            self.pool.len()
        )));
        let report = self.pool.broadcast(line);

        let listener = self.pool.listener();
        let mirrored = self.mirror_to_listener && listener.is_ready() && listener.try_send(line).is_ok();

        DispatchOutcome::Broadcast { report, mirrored }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryConsole, MockSessionConnector};
    use crate::domain::client::{ChatObserver, ClientContext};
    use crate::domain::foundation::{BaseName, Identity};
    use crate::domain::pool::{Endpoint, PoolSettings};
    use crate::ports::{LineKind, SessionEventHandler};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::num::NonZeroUsize;

    struct NullRelay;

    impl ChatObserver for NullRelay {
        fn on_chat(&self, _: Option<&Identity>, _: &str, _: &str) {}
    }

    fn setup(count: usize) -> (Arc<Pool>, Arc<MockSessionConnector>, Arc<InMemoryConsole>) {
        let connector = Arc::new(MockSessionConnector::new());
        let console = Arc::new(InMemoryConsole::new());
        let ctx = ClientContext {
            connector: connector.clone(),
            console: console.clone(),
        };
        let settings = PoolSettings {
            endpoint: Endpoint::new("localhost", 25565),
            base_name: BaseName::new("bot").unwrap(),
            desired_count: NonZeroUsize::new(count).unwrap(),
            protocol_version: "1.8.9".into(),
        };
        let pool = Pool::construct(&settings, &ctx, Arc::new(NullRelay), &mut StdRng::seed_from_u64(3));
        (Arc::new(pool), connector, console)
    }

    #[tokio::test]
    async fn blank_lines_are_ignored() {
        let (pool, connector, console) = setup(2);
        for client in pool.clients() {
            client.on_spawned();
        }
        console.clear();
        let dispatcher = Dispatcher::new(pool, console.clone());

        assert_eq!(dispatcher.dispatch(""), DispatchOutcome::Ignored);
        assert_eq!(dispatcher.dispatch("   "), DispatchOutcome::Ignored);
        assert_eq!(dispatcher.dispatch("\t"), DispatchOutcome::Ignored);

        assert!(console.lines().is_empty());
        for handle in connector.handles() {
            assert!(handle.sent().is_empty());
        }
    }

    #[tokio::test]
    async fn text_is_announced_and_broadcast_verbatim() {
        let (pool, connector, console) = setup(2);
        for client in pool.clients() {
            client.on_spawned();
        }
        let dispatcher = Dispatcher::new(pool, console.clone());

        let outcome = dispatcher.dispatch("  /say hi  ");

        assert_eq!(
            outcome,
            DispatchOutcome::Broadcast {
                report: BroadcastReport { sent: 2, deferred: 0, failed: 0 },
                mirrored: false
            }
        );
        assert!(console.contains(LineKind::Status, "sending \"  /say hi  \" to all 2 clients"));
        for handle in connector.handles() {
            assert_eq!(handle.sent(), vec!["  /say hi  "]);
        }
    }

    #[tokio::test]
    async fn mirror_sends_twice_through_ready_listener() {
        let (pool, connector, console) = setup(2);
        for client in pool.clients() {
            client.on_spawned();
        }
        let dispatcher = Dispatcher::new(pool, console).with_mirror_to_listener(true);

        let outcome = dispatcher.dispatch("gm");

        assert!(matches!(outcome, DispatchOutcome::Broadcast { mirrored: true, .. }));
        assert_eq!(connector.handle(0).unwrap().sent(), vec!["gm", "gm"]);
        assert_eq!(connector.handle(1).unwrap().sent(), vec!["gm"]);
    }

    #[tokio::test]
    async fn mirror_skips_listener_that_is_not_ready() {
        let (pool, connector, console) = setup(1);
        let dispatcher = Dispatcher::new(pool.clone(), console).with_mirror_to_listener(true);

        let outcome = dispatcher.dispatch("gm");
        assert!(matches!(outcome, DispatchOutcome::Broadcast { mirrored: false, .. }));

        pool.listener().on_spawned();
        assert_eq!(connector.handle(0).unwrap().sent(), vec!["gm"]);
    }
}
