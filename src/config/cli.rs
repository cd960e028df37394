//! Command-line arguments

use clap::Parser;

/// Connects a pool of chat clients to one server and broadcasts every line
/// typed on stdin through all of them.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "chat-swarm", version)]
pub struct Cli {
    /// Server host name or address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Base name; each client appends a random suffix
    pub base_name: String,

    /// Number of clients to connect
    pub count: usize,

    /// Protocol version passed to every session
    #[arg(value_name = "VERSION")]
    pub protocol_version: String,
}
