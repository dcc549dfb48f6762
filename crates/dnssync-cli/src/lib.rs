//! # dnssync-cli
//!
//! `check_dns_sync`, a monitoring plugin that verifies every nameserver of a
//! zone serves the same SOA serial.
//!
//! ## Features
//!
//! - **Authority discovery**: ask the servers listed in the zone's NS records
//! - **Explicit lists**: ask given servers, concurrently
//! - **Two backends**: the `dig` tool or native DNS queries
//! - **Plugin output**: status line, performance data and exit code, or JSON

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::run;
