//! Command loop - Feeds operator input to the dispatcher until interrupted.

use std::future::Future;
use std::sync::Arc;

use crate::ports::{CommandSource, ConsoleLine, ConsoleSink};

use super::{DispatchOutcome, Dispatcher, ShutdownCoordinator, ShutdownOutcome};

pub struct CommandLoop {
    dispatcher: Dispatcher,
    coordinator: Arc<ShutdownCoordinator>,
    console: Arc<dyn ConsoleSink>,
}

impl CommandLoop {
    pub fn new(
        dispatcher: Dispatcher,
        coordinator: Arc<ShutdownCoordinator>,
        console: Arc<dyn ConsoleSink>,
    ) -> Self {
        Self {
            dispatcher,
            coordinator,
            console,
        }
    }

    /// Dispatches each line from `source` until `interrupt` resolves, then
    /// shuts the pool down.
    ///
    /// When the source is exhausted or fails, the pool stays up and the loop
    /// keeps waiting for `interrupt`.
    pub async fn run<S, F>(&self, source: &mut S, interrupt: F) -> ShutdownOutcome
    where
        S: CommandSource + ?Sized,
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);
        let mut dispatched = 0usize;

        loop {
            tokio::select! {
                biased;
                _ = &mut interrupt => {
                    tracing::debug!(dispatched, "interrupt received");
                    break;
                }
                line = source.next_line() => match line {
                    Ok(Some(line)) => {
                        if let DispatchOutcome::Broadcast { .. } = self.dispatcher.dispatch(&line) {
                            dispatched += 1;
                        }
                    }
                    Ok(None) => {
                        self.console.emit(ConsoleLine::warning(
                            "input closed; press Ctrl-C to disconnect all clients",
                        ));
                        interrupt.as_mut().await;
                        break;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "command input failed");
                        self.console.emit(ConsoleLine::warning(format!(
                            "input failed: {}; press Ctrl-C to disconnect all clients",
                            err
                        )));
                        interrupt.as_mut().await;
                        break;
                    }
                },
            }
        }

        self.coordinator.shutdown().await
    }
}
