//! Chat Swarm - A pool of concurrently connecting chat clients
//!
//! Every client connects to the same server under its own generated name.
//! Operator input is broadcast through all of them, deferred for clients
//! still connecting, while one designated listener relays inbound chat back
//! to the console.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
