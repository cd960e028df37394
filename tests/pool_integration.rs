//! Integration tests for the pool, dispatcher, relay, and shutdown wiring.
//!
//! Everything runs against the mock session connector and the in-memory
//! console, driving session events the way a real server would.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use chat_swarm::adapters::{InMemoryConsole, MockSessionConnector, ScriptedCommandSource};
use chat_swarm::application::{
    CommandLoop, DispatchOutcome, Dispatcher, ListenerRelay, ShutdownCoordinator, ShutdownOutcome,
};
use chat_swarm::domain::client::ClientContext;
use chat_swarm::domain::foundation::{BaseName, ClientState};
use chat_swarm::domain::pool::{BroadcastReport, Endpoint, Pool, PoolSettings};
use chat_swarm::ports::LineKind;

struct Harness {
    pool: Arc<Pool>,
    connector: Arc<MockSessionConnector>,
    console: Arc<InMemoryConsole>,
}

impl Harness {
    fn new(count: usize) -> Self {
        let connector = Arc::new(MockSessionConnector::new());
        let console = Arc::new(InMemoryConsole::new());
        let ctx = ClientContext {
            connector: connector.clone(),
            console: console.clone(),
        };
        let settings = PoolSettings {
            endpoint: Endpoint::new("localhost", 25565),
            base_name: BaseName::new("hello").unwrap(),
            desired_count: NonZeroUsize::new(count).unwrap(),
            protocol_version: "1.8.9".to_string(),
        };
        let relay = Arc::new(ListenerRelay::new(console.clone()));
        let pool = Pool::construct(&settings, &ctx, relay, &mut StdRng::seed_from_u64(2024));
        Self {
            pool: Arc::new(pool),
            connector,
            console,
        }
    }

    fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.pool.clone(), self.console.clone())
    }

    /// Spawns client `n` through its session and waits until it is ready.
    async fn spawn(&self, n: usize) {
        let mut state = self.pool.clients()[n].subscribe_state();
        self.connector.handle(n).unwrap().spawn();
        state.wait_for(|s| *s == ClientState::Ready).await.unwrap();
    }

    async fn end(&self, n: usize) {
        let mut state = self.pool.clients()[n].subscribe_state();
        self.connector.handle(n).unwrap().end();
        state.wait_for(|s| *s == ClientState::Ended).await.unwrap();
    }

    /// Lets every client's event pump drain what has been emitted so far.
    async fn settle(&self) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }
}

#[tokio::test]
async fn gm_all_reaches_both_ready_clients_and_echo_is_suppressed() {
    let harness = Harness::new(2);
    harness.spawn(0).await;
    harness.spawn(1).await;

    let outcome = harness.dispatcher().dispatch("gm all");
    assert_eq!(
        outcome,
        DispatchOutcome::Broadcast {
            report: BroadcastReport { sent: 2, deferred: 0, failed: 0 },
            mirrored: false
        }
    );

    // The server echoes both messages to everyone; only the listener relays.
    let listener_name = harness.pool.listener().identity().to_string();
    let member_name = harness.pool.clients()[1].identity().to_string();
    for handle in harness.connector.handles() {
        handle.chat(&listener_name, "gm all");
        handle.chat(&member_name, "gm all");
    }
    harness.settle().await;

    for handle in harness.connector.handles() {
        assert_eq!(handle.sent(), vec!["gm all"]);
    }
    let chat = harness.console.lines_of(LineKind::Chat);
    assert_eq!(chat.len(), 1);
    assert_eq!(chat[0].text, format!("{} -> gm all", member_name));
}

#[tokio::test]
async fn commands_typed_before_readiness_arrive_after_spawn_in_order() {
    let harness = Harness::new(3);
    harness.spawn(0).await;
    let dispatcher = harness.dispatcher();

    dispatcher.dispatch("first");
    dispatcher.dispatch("");
    dispatcher.dispatch("second");

    assert_eq!(harness.connector.handle(0).unwrap().sent(), vec!["first", "second"]);
    assert!(harness.connector.handle(1).unwrap().sent().is_empty());

    harness.spawn(1).await;
    harness.spawn(2).await;
    dispatcher.dispatch("third");

    for handle in harness.connector.handles() {
        assert_eq!(handle.sent(), vec!["first", "second", "third"]);
    }
}

#[tokio::test]
async fn kicked_client_is_isolated_from_the_rest() {
    let harness = Harness::new(3);
    for n in 0..3 {
        harness.spawn(n).await;
    }

    let mut state = harness.pool.clients()[1].subscribe_state();
    harness.connector.handle(1).unwrap().kick("flooding");
    state.wait_for(|s| *s == ClientState::Ended).await.unwrap();

    let outcome = harness.dispatcher().dispatch("still here");

    assert!(matches!(
        outcome,
        DispatchOutcome::Broadcast {
            report: BroadcastReport { sent: 2, deferred: 0, failed: 1 },
            ..
        }
    ));
    assert!(harness.connector.handle(1).unwrap().sent().is_empty());
    assert_eq!(harness.console.count(LineKind::Warning), 1);
    assert!(harness.console.contains(LineKind::Warning, "client #2"));
    assert!(harness.console.contains(LineKind::Warning, "kicked: flooding"));
}

#[tokio::test]
async fn client_ending_before_ready_reports_dropped_commands() {
    let harness = Harness::new(2);
    harness.spawn(0).await;
    harness.dispatcher().dispatch("queued");

    harness.end(1).await;

    assert!(harness
        .console
        .contains(LineKind::Warning, "1 deferred message(s) dropped"));
    assert_eq!(harness.pool.state_counts().ended, 1);
}

#[tokio::test]
async fn listener_relays_nothing_until_it_has_spawned() {
    let harness = Harness::new(2);
    let listener = harness.connector.handle(0).unwrap();

    listener.chat("Steve", "too early");
    harness.settle().await;
    assert!(harness.console.lines_of(LineKind::Chat).is_empty());

    harness.spawn(0).await;
    listener.chat("Steve", "hi");
    harness.connector.handle(1).unwrap().chat("Alex", "member only");
    harness.settle().await;

    let chat = harness.console.lines_of(LineKind::Chat);
    assert_eq!(chat.len(), 1);
    assert_eq!(chat[0].to_string(), "[CHAT] Steve -> hi");
}

#[tokio::test(start_paused = true)]
async fn interrupt_disconnects_every_client_once_and_exits_after_grace() {
    let harness = Harness::new(3);
    harness.spawn(0).await;
    harness.connector.handle(2).unwrap().fail_disconnects(true);

    let coordinator = Arc::new(
        ShutdownCoordinator::new(harness.pool.clone(), harness.console.clone())
            .with_grace_period(Duration::from_millis(500)),
    );
    let command_loop = CommandLoop::new(
        harness.dispatcher(),
        coordinator.clone(),
        harness.console.clone(),
    );
    let mut source = ScriptedCommandSource::new(["gm all"]);
    let started = tokio::time::Instant::now();

    let outcome = command_loop
        .run(&mut source, tokio::time::sleep(Duration::from_secs(1)))
        .await;

    assert!(started.elapsed() >= Duration::from_millis(1500));
    match outcome {
        ShutdownOutcome::Completed(report) => {
            assert_eq!(report.requested, 3);
            assert_eq!(report.failed, 1);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(coordinator.shutdown().await, ShutdownOutcome::AlreadyRequested);

    for handle in harness.connector.handles() {
        assert_eq!(handle.disconnect_count(), 1);
    }
    assert_eq!(harness.connector.handle(0).unwrap().sent(), vec!["gm all"]);
    assert!(harness.console.contains(LineKind::Banner, "shutting down 3 clients"));
    assert!(harness.console.contains(LineKind::Warning, "failed to disconnect"));
}
