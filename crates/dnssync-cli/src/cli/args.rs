//! Command-line argument definitions using clap.

use clap::{ArgAction, Parser};
use dnssync_core::{Range, SerialArithmetic};
use std::path::PathBuf;

use crate::config::Backend;
use crate::output::OutputFormat;

/// Check that DNS servers are at the same update
///
/// Compares the SOA serial served by every nameserver of a zone and reports
/// servers lagging behind the most advanced one. Exit codes follow the
/// monitoring plugin convention: 0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN.
#[derive(Parser, Debug)]
#[command(name = "check_dns_sync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address of zone to test
    #[arg(short = 'z', long)]
    pub zone: String,

    /// Query the ns from the zone's authority (NS field)
    #[arg(long = "use-ns", overrides_with = "no_use_ns")]
    pub use_ns: bool,

    /// Query the servers given with --nameservers instead
    #[arg(long = "no-use-ns", overrides_with = "use_ns")]
    pub no_use_ns: bool,

    /// Specify the ns to query to (also -ns; comma-separated or repeated)
    #[arg(long, visible_alias = "ns", num_args = 0.., value_delimiter = ',')]
    pub nameservers: Vec<String>,

    /// Display how many versions behind each server is
    #[arg(short, long)]
    pub metric: bool,

    /// Increase output verbosity (use up to 3 times)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Warning range for a server's lag
    #[arg(short, long, value_name = "RANGE")]
    pub warning: Option<Range>,

    /// Critical range for a server's lag; `~:` never alerts [default: @1:]
    #[arg(short, long, value_name = "RANGE")]
    pub critical: Option<Range>,

    /// How serials are queried
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Path to the dig executable
    #[arg(long, env = "CHECK_DNS_SYNC_DIG", value_name = "PATH")]
    pub dig: Option<PathBuf>,

    /// Per-query timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Timeout for the whole probe in seconds
    #[arg(long, value_name = "SECS")]
    pub probe_timeout: Option<u64>,

    /// Maximum number of servers queried at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// DNS port (resolver backend)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Serial comparison: numeric or rfc1982
    #[arg(long, value_name = "MODE")]
    pub serial_arithmetic: Option<SerialArithmetic>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Configuration file
    #[arg(long, env = "CHECK_DNS_SYNC_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Whether servers are discovered from the zone's NS records
    #[must_use]
    pub const fn from_authority(&self) -> bool {
        !self.no_use_ns
    }

    /// Verbosity capped at the highest meaningful level
    #[must_use]
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }
}

/// Rewrite the single-dash `-ns` spelling, which clap cannot express, into
/// `--nameservers`.
pub fn normalize_args<I, T>(args: I) -> Vec<std::ffi::OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if arg == "-ns" {
                "--nameservers".into()
            } else {
                arg
            }
        })
        .collect()
}
