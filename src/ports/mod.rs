//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the pool and the outside world. Adapters implement these ports.
//!
//! - `SessionConnector` / `Session` - Connections to the remote endpoint
//! - `SessionEventHandler` - Typed callbacks for session events
//! - `ConsoleSink` - Operator-facing output
//! - `CommandSource` - Operator command input

mod command_source;
mod console_sink;
mod session;

pub use command_source::{CommandSource, CommandSourceError};
pub use console_sink::{ConsoleLine, ConsoleSink, LineKind};
pub use session::{
    pump_events, Session, SessionConnector, SessionError, SessionEvent, SessionEventHandler,
    SessionEvents, SessionRequest,
};
