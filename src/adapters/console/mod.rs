//! Console adapters - Implementations of the `ConsoleSink` port.

mod in_memory;
mod stdout;

pub use in_memory::InMemoryConsole;
pub use stdout::StdoutConsole;
