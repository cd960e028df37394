//! Client module - A single pooled connection.
//!
//! - `aggregate` - The `Client` entity, its role, and its session callbacks
//! - `send` - Outcomes of offering a payload to a client

mod aggregate;
mod send;

pub use aggregate::{ChatObserver, Client, ClientContext, ClientLabel, ClientRole};
pub use send::{SendError, SendOutcome};
