//! Session adapters - Implementations of the `SessionConnector` port.
//!
//! - `line` - Line-oriented TCP sessions used by the binary
//! - `mock` - Scriptable sessions for tests

mod line;
mod mock;

pub use line::{parse_inbound, InboundLine, LineSessionConnector, MAX_LINE_LENGTH};
pub use mock::{MockSessionConnector, MockSessionHandle};
