//! Application configuration module
//!
//! Connection parameters come from positional command-line arguments
//! ([`Cli`]); runtime tuning comes from environment variables loaded with
//! the `config` and `dotenvy` crates under the `CHAT_SWARM` prefix, with
//! `__` separating the prefix from the key.
//!
//! # Example
//!
//! ```no_run
//! use chat_swarm::config::{AppConfig, Cli};
//! use clap::Parser;
//!
//! let config = AppConfig::load(Cli::parse()).expect("Failed to load configuration");
//! let settings = config.validate().expect("Invalid configuration");
//!
//! println!("Connecting {} clients to {}", settings.desired_count, settings.endpoint);
//! ```

mod cli;
mod error;
mod runtime;

pub use cli::Cli;
pub use error::{ConfigError, ValidationError};
pub use runtime::{RuntimeConfig, MAX_GRACE_PERIOD_MS};

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::domain::foundation::BaseName;
use crate::domain::pool::{Endpoint, PoolSettings};

/// Environment variable prefix for runtime settings.
pub const ENV_PREFIX: &str = "CHAT_SWARM";

/// Root application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub cli: Cli,
    pub runtime: RuntimeConfig,
}

impl AppConfig {
    pub fn new(cli: Cli, runtime: RuntimeConfig) -> Self {
        Self { cli, runtime }
    }

    /// Load runtime settings from the environment and pair them with `cli`
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHAT_SWARM` prefix
    /// 3. Deserializes them, falling back to defaults for anything unset
    ///
    /// # Environment Variable Format
    ///
    /// - `CHAT_SWARM__GRACE_PERIOD_MS=1000` -> `runtime.grace_period_ms = 1000`
    /// - `CHAT_SWARM__MIRROR_TO_LISTENER=true` -> `runtime.mirror_to_listener = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value cannot be parsed into its expected type.
    pub fn load(cli: Cli) -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let runtime = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(Self::new(cli, runtime))
    }

    /// Validate all configuration values and build the pool settings
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an empty host or protocol version, port
    /// zero, a zero client count, an unusable base name, or out-of-range
    /// runtime settings.
    pub fn validate(&self) -> Result<PoolSettings, ValidationError> {
        let cli = &self.cli;
        if cli.host.trim().is_empty() {
            return Err(ValidationError::MissingRequired("host"));
        }
        if cli.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        let desired_count = NonZeroUsize::new(cli.count).ok_or(ValidationError::InvalidCount)?;
        let base_name = BaseName::new(cli.base_name.as_str()).map_err(ValidationError::InvalidBaseName)?;
        if cli.protocol_version.trim().is_empty() {
            return Err(ValidationError::MissingRequired("version"));
        }
        self.runtime.validate()?;

        Ok(PoolSettings {
            endpoint: Endpoint::new(cli.host.as_str(), cli.port),
            base_name,
            desired_count,
            protocol_version: cli.protocol_version.clone(),
        })
    }

    pub fn grace_period(&self) -> Duration {
        self.runtime.grace_period()
    }
}
