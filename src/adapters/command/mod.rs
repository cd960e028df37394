//! Command adapters - Implementations of the `CommandSource` port.
//!
//! - `lines` - Thread-backed line reader used for stdin
//! - `scripted` - Fixed command lists for tests

mod lines;
mod scripted;

pub use lines::LineCommandSource;
pub use scripted::ScriptedCommandSource;
