//! Pool module - The fixed-size collection of clients.
//!
//! - `aggregate` - `Pool` construction, broadcast, and shutdown
//! - `settings` - Validated construction inputs

mod aggregate;
mod settings;

pub use aggregate::{BroadcastReport, Pool, ShutdownReport, StateCounts};
pub use settings::{Endpoint, PoolSettings};
