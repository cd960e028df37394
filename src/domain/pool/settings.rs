//! Validated inputs for building a pool.

use std::fmt;
use std::num::NonZeroUsize;

use crate::domain::foundation::BaseName;

/// Remote endpoint every client connects to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Everything [`Pool::construct`](super::Pool::construct) needs.
///
/// Built by the configuration layer, which owns validation; the count is
/// non-zero by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub endpoint: Endpoint,
    pub base_name: BaseName,
    pub desired_count: NonZeroUsize,
    pub protocol_version: String,
}
