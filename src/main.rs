//! chat-swarm binary
//!
//! Usage: `chat-swarm <HOST> <PORT> <BASE_NAME> <COUNT> <VERSION>`

use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};

use chat_swarm::adapters::{LineCommandSource, LineSessionConnector, StdoutConsole};
use chat_swarm::application::{self, ExitStatus};
use chat_swarm::config::{AppConfig, Cli};

const EXAMPLE_INVOCATION: &str = "example: chat-swarm localhost 25565 hello 10 1.8.9";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    let config = match AppConfig::load(cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("! {}", err);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.runtime.log_filter, config.runtime.log_json);

    let mut source = match LineCommandSource::stdin() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("! unable to read commands: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let status = application::run(
        &config,
        Arc::new(LineSessionConnector::new()),
        Arc::new(StdoutConsole::new()),
        &mut source,
        interrupt(),
    )
    .await;

    if status == ExitStatus::ConfigurationError {
        eprintln!("{}", Cli::command().render_usage());
        eprintln!("{}", EXAMPLE_INVOCATION);
    }
    status.into()
}

fn init_tracing(fallback: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Resolves on the first Ctrl-C.
async fn interrupt() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "unable to listen for Ctrl-C");
        // The default signal disposition still terminates the process.
        std::future::pending::<()>().await;
    }
}
