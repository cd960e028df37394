//! Domain layer containing the pool's lifecycle rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identities, client state, errors)
//! - `client` - A single pooled connection and its readiness state machine
//! - `pool` - The fixed set of clients and fan-out operations

pub mod client;
pub mod foundation;
pub mod pool;
