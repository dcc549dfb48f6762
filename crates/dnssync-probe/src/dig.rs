//! Serial collection through the `dig` command-line tool.
//!
//! Two invocations are used:
//!
//! ```text
//! dig example.org +nssearch
//! SOA ns1.example.org. hostmaster.example.org. 2024010101 3600 900 604800 86400 from server 192.0.2.1 in 12 ms.
//!
//! dig example.org SOA @192.0.2.1 +short
//! ns1.example.org. hostmaster.example.org. 2024010101 3600 900 604800 86400
//! ```
//!
//! Parsing depends on those column positions: the serial is field 3 of an
//! `+nssearch` line and the answering server is field 10; the serial is field
//! 2 of a `+short` answer.

use async_trait::async_trait;
use dnssync_core::{Result, SerialRecord, SyncError};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::source::SerialSource;

/// Default tool name, looked up on `PATH`
pub const DEFAULT_DIG: &str = "dig";

/// Marker dig prints when a server does not answer
const TIMEOUT_MARKER: &str = "timed out";

/// Token a usable `+nssearch` line must contain
const SOA_TOKEN: &str = "SOA ";

const NSSEARCH_SERIAL_FIELD: usize = 3;
const NSSEARCH_SERVER_FIELD: usize = 10;
const SHORT_SERIAL_FIELD: usize = 2;

/// Captured output of one tool run
#[derive(Debug, Clone, Default)]
struct ToolOutput {
    stdout: String,
    stderr: String,
}

/// `dig`-backed serial source
#[derive(Debug, Clone)]
pub struct DigSource {
    program: PathBuf,
    timeout: Duration,
}

impl Default for DigSource {
    fn default() -> Self {
        Self::new(DEFAULT_DIG)
    }
}

impl DigSource {
    /// Use the given `dig` executable
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the hard limit for a single tool run
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the tool; the child is killed if the run is abandoned.
    async fn run(&self, args: &[&str], server: Option<&str>) -> Result<ToolOutput> {
        debug!(program = %self.program.display(), ?args, "running dig");

        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SyncError::Timeout {
                server: server.map(ToString::to_string),
            })?
            .map_err(|source| self.spawn_error(source))?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn spawn_error(&self, source: std::io::Error) -> SyncError {
        SyncError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl SerialSource for DigSource {
    fn name(&self) -> &'static str {
        "dig"
    }

    async fn authority(&self, zone: &str) -> Result<Vec<SerialRecord>> {
        let output = self.run(&[zone, "+nssearch"], None).await?;
        parse_nssearch(&output.stdout)
    }

    async fn explicit(&self, zone: &str, server: &str) -> Result<SerialRecord> {
        let at = format!("@{server}");
        let output = self.run(&[zone, "SOA", &at, "+short"], Some(server)).await?;
        parse_short(server, &output.stdout, &output.stderr)
    }
}

/// Parse `dig +nssearch` output into one record per answering server.
pub fn parse_nssearch(answers: &str) -> Result<Vec<SerialRecord>> {
    if answers.contains(TIMEOUT_MARKER) {
        return Err(SyncError::Timeout { server: None });
    }

    let records = answers
        .lines()
        .filter(|line| !line.is_empty())
        .map(parse_nssearch_line)
        .collect::<Result<Vec<_>>>()?;

    if records.is_empty() {
        return Err(SyncError::EmptyAnswer);
    }
    Ok(records)
}

fn parse_nssearch_line(line: &str) -> Result<SerialRecord> {
    let unparsable = || SyncError::Parse(line.to_string());
    if !line.contains(SOA_TOKEN) {
        return Err(unparsable());
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let serial = fields
        .get(NSSEARCH_SERIAL_FIELD)
        .and_then(|f| f.parse::<u32>().ok())
        .ok_or_else(unparsable)?;
    let server = fields.get(NSSEARCH_SERVER_FIELD).ok_or_else(unparsable)?;

    Ok(SerialRecord::new(*server, serial))
}

/// Parse `dig SOA @server +short` output for `server`.
pub fn parse_short(server: &str, answer: &str, error: &str) -> Result<SerialRecord> {
    if answer.contains(TIMEOUT_MARKER) {
        return Err(SyncError::timeout_on(server));
    }
    if !error.is_empty() {
        return Err(SyncError::Tool(error.trim_end().to_string()));
    }
    if answer.trim().is_empty() {
        return Err(SyncError::EmptyAnswer);
    }

    let serial = answer
        .split_whitespace()
        .nth(SHORT_SERIAL_FIELD)
        .and_then(|f| f.parse::<u32>().ok())
        .ok_or_else(|| SyncError::Parse(answer.trim_end().to_string()))?;

    Ok(SerialRecord::new(server, serial))
}
