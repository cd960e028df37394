//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the pool to external systems:
//! - `session` - Remote endpoint sessions (TCP line protocol, mock)
//! - `console` - Operator output (stdout, in-memory)
//! - `command` - Operator input (line readers)

pub mod command;
pub mod console;
pub mod session;

pub use command::{LineCommandSource, ScriptedCommandSource};
pub use console::{InMemoryConsole, StdoutConsole};
pub use session::{LineSessionConnector, MockSessionConnector, MockSessionHandle};
