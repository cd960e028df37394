//! ShutdownCoordinator - Tears the pool down exactly once.
//!
//! Interrupts can arrive more than once (repeated Ctrl-C, EOF followed by a
//! signal). Only the first request disconnects the pool and waits out the
//! grace period; later requests return immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::pool::{Pool, ShutdownReport};
use crate::ports::{ConsoleLine, ConsoleSink};

/// Default wait between disconnecting and exiting.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    Completed(ShutdownReport),
    /// Another caller already started the shutdown.
    AlreadyRequested,
}

pub struct ShutdownCoordinator {
    pool: Arc<Pool>,
    console: Arc<dyn ConsoleSink>,
    grace: Duration,
    started: AtomicBool,
}

impl ShutdownCoordinator {
    pub fn new(pool: Arc<Pool>, console: Arc<dyn ConsoleSink>) -> Self {
        Self {
            pool,
            console,
            grace: DEFAULT_GRACE_PERIOD,
            started: AtomicBool::new(false),
        }
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn grace_period(&self) -> Duration {
        self.grace
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Disconnects every client and waits the grace period.
    pub async fn shutdown(&self) -> ShutdownOutcome {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("shutdown already in progress");
            return ShutdownOutcome::AlreadyRequested;
        }

        let counts = self.pool.state_counts();
        self.console.emit(ConsoleLine::banner(format!(
            "shutting down {} clients ({} ready, {} connecting, {} ended)",
            self.pool.len(),
            counts.ready,
            counts.connecting,
            counts.ended
        )));

        let report = self.pool.shutdown_all(self.grace).await;
        tracing::info!(
            requested = report.requested,
            failed = report.failed,
            grace_ms = report.grace.as_millis() as u64,
            "shutdown complete"
        );
        ShutdownOutcome::Completed(report)
    }
}
