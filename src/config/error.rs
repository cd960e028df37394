//! Configuration error types

use thiserror::Error;

use crate::domain::foundation::ValidationError as FieldError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Client count must be a positive integer")]
    InvalidCount,

    #[error("Invalid base name: {0}")]
    InvalidBaseName(#[source] FieldError),

    #[error("Grace period must be between 1 and {max} ms, got {actual}")]
    InvalidGracePeriod { max: u64, actual: u64 },

    #[error("Log filter must not be empty")]
    EmptyLogFilter,
}
