//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, lifecycle enums, and error types
//! that form the vocabulary of the client pool.

mod client_state;
mod errors;
mod identity;
mod state_machine;

pub use client_state::ClientState;
pub use errors::{FaultKind, ValidationError};
pub use identity::{BaseName, Identity, SUFFIX_LEN};
pub use state_machine::StateMachine;
