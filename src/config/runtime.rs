//! Runtime tuning read from the environment

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Longest accepted shutdown grace period.
pub const MAX_GRACE_PERIOD_MS: u64 = 60_000;

/// Settings that are not part of the command line.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Wait between disconnecting all clients and exiting
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    /// Send each command through the listener a second time
    #[serde(default)]
    pub mirror_to_listener: bool,

    /// Diagnostics filter directive, used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit diagnostics as JSON instead of human-readable text
    #[serde(default)]
    pub log_json: bool,

    /// Print the startup title block
    #[serde(default = "default_show_banner")]
    pub show_banner: bool,
}

impl RuntimeConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.grace_period_ms == 0 || self.grace_period_ms > MAX_GRACE_PERIOD_MS {
            return Err(ValidationError::InvalidGracePeriod {
                max: MAX_GRACE_PERIOD_MS,
                actual: self.grace_period_ms,
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(ValidationError::EmptyLogFilter);
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            grace_period_ms: default_grace_period_ms(),
            mirror_to_listener: false,
            log_filter: default_log_filter(),
            log_json: false,
            show_banner: default_show_banner(),
        }
    }
}

fn default_grace_period_ms() -> u64 {
    500
}

fn default_log_filter() -> String {
    "info,chat_swarm=info".to_string()
}

fn default_show_banner() -> bool {
    true
}
