//! Runner - One full session from validated configuration to exit status.
//!
//! The binary supplies the real connector, console, stdin source, and Ctrl-C
//! future; tests supply mocks and a timer.

use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::client::ClientContext;
use crate::domain::foundation::FaultKind;
use crate::domain::pool::{Pool, PoolSettings};
use crate::ports::{CommandSource, ConsoleLine, ConsoleSink, SessionConnector};

use super::{CommandLoop, Dispatcher, ListenerRelay, ShutdownCoordinator, ShutdownOutcome};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The pool was shut down after an interrupt.
    Success,
    /// Arguments or runtime settings were rejected before any client started.
    ConfigurationError,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::ConfigurationError => 2,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Validates `config`, starts the pool, and feeds it `source` until
/// `interrupt` resolves and the grace period has elapsed.
///
/// Returns as soon as shutdown completes. Nothing here waits on `source`
/// after the interrupt, so a read still pending at that point never holds up
/// the exit.
pub async fn run<S, F>(
    config: &AppConfig,
    connector: Arc<dyn SessionConnector>,
    console: Arc<dyn ConsoleSink>,
    source: &mut S,
    interrupt: F,
) -> ExitStatus
where
    S: CommandSource + ?Sized,
    F: Future<Output = ()>,
{
    let settings = match config.validate() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(kind = %FaultKind::Configuration, error = %err, "refusing to start");
            console.emit(ConsoleLine::warning(format!(
                "{} fault: {}",
                FaultKind::Configuration,
                err
            )));
            return ExitStatus::ConfigurationError;
        }
    };

    if config.runtime.show_banner {
        print_title(console.as_ref());
    }
    console.emit(ConsoleLine::banner(format!(
        "starting {} clients against {}",
        settings.desired_count, settings.endpoint
    )));

    let pool = Arc::new(build_pool(&settings, connector, console.clone()));
    console.emit(ConsoleLine::banner(
        "clients are joining; you can now type commands",
    ));

    let dispatcher = Dispatcher::new(pool.clone(), console.clone())
        .with_mirror_to_listener(config.runtime.mirror_to_listener);
    let coordinator = Arc::new(
        ShutdownCoordinator::new(pool, console.clone()).with_grace_period(config.grace_period()),
    );
    let command_loop = CommandLoop::new(dispatcher, coordinator, console);

    match command_loop.run(source, interrupt).await {
        ShutdownOutcome::Completed(report) => {
            tracing::info!(failed = report.failed, "exiting");
        }
        ShutdownOutcome::AlreadyRequested => {}
    }
    ExitStatus::Success
}

fn print_title(console: &dyn ConsoleSink) {
    console.emit(ConsoleLine::banner(format!(
        "chat-swarm {}",
        env!("CARGO_PKG_VERSION")
    )));
    console.emit(ConsoleLine::banner(
        "every line you type is sent through every connected client",
    ));
    console.emit(ConsoleLine::banner("press Ctrl-C to disconnect all clients"));
}

fn build_pool(
    settings: &PoolSettings,
    connector: Arc<dyn SessionConnector>,
    console: Arc<dyn ConsoleSink>,
) -> Pool {
    let ctx = ClientContext {
        connector,
        console: console.clone(),
    };
    let relay = Arc::new(ListenerRelay::new(console));
    Pool::construct(settings, &ctx, relay, &mut rand::thread_rng())
}
