//! Application layer - Operator-facing orchestration over the pool.
//!
//! - `dispatcher` - one input line becomes one broadcast
//! - `listener_relay` - inbound chat from the listener reaches the console
//! - `shutdown` - idempotent teardown with a grace period
//! - `command_loop` - ties input, dispatch, and interrupt together
//! - `runner` - one run from configuration to exit status

mod command_loop;
mod dispatcher;
mod listener_relay;
mod runner;
mod shutdown;

pub use command_loop::CommandLoop;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use listener_relay::{ListenerRelay, RelayDecision};
pub use runner::{run, ExitStatus};
pub use shutdown::{ShutdownCoordinator, ShutdownOutcome, DEFAULT_GRACE_PERIOD};
