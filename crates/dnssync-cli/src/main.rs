//! check_dns_sync - DNS zone serial sync check
//!
//! Verifies that all nameservers of a zone are at the same update.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dnssync_cli::run().await
}
