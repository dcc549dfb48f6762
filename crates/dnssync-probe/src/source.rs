//! The serial source seam and the collection driver.

use async_trait::async_trait;
use dnssync_core::{Result, SerialRecord, SyncError};
use futures_util::{stream, StreamExt, TryStreamExt};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Something that can ask nameservers for a zone's SOA serial
#[async_trait]
pub trait SerialSource: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Discover the zone's authoritative servers and return one serial per
    /// server, in discovery order.
    async fn authority(&self, zone: &str) -> Result<Vec<SerialRecord>>;

    /// Ask `server` directly for the zone's serial.
    async fn explicit(&self, zone: &str, server: &str) -> Result<SerialRecord>;
}

/// Which servers to ask
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    /// Servers listed in the zone's own NS records
    Authority,
    /// A caller-supplied list of servers
    Explicit(Vec<String>),
}

/// Timing and fan-out limits for one probe
#[derive(Debug, Clone, Copy)]
pub struct ProbeOptions {
    /// Wall-clock limit for a single query
    pub query_timeout: Duration,

    /// Wall-clock limit for the whole collection
    pub probe_timeout: Duration,

    /// Maximum queries in flight at once
    pub concurrency: usize,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(30),
            concurrency: 8,
        }
    }
}

/// Collect serials for `zone` from `source`.
///
/// Any single failure fails the whole collection; queries still in flight
/// are dropped.
pub async fn collect<S>(
    source: &S,
    zone: &str,
    mode: &QueryMode,
    options: &ProbeOptions,
) -> Result<Vec<SerialRecord>>
where
    S: SerialSource + ?Sized,
{
    debug!(backend = source.name(), zone, ?mode, "collecting serials");

    let probe = async {
        match mode {
            QueryMode::Authority => source.authority(zone).await,
            QueryMode::Explicit(servers) => explicit_all(source, zone, servers, options).await,
        }
    };

    let records = timeout(options.probe_timeout, probe)
        .await
        .unwrap_or(Err(SyncError::Timeout { server: None }))
        .map_err(|e| {
            warn!(zone, error = %e, "serial collection failed");
            e
        })?;

    debug!(zone, servers = records.len(), "serials collected");
    Ok(records)
}

async fn explicit_all<S>(
    source: &S,
    zone: &str,
    servers: &[String],
    options: &ProbeOptions,
) -> Result<Vec<SerialRecord>>
where
    S: SerialSource + ?Sized,
{
    if servers.is_empty() {
        return Err(SyncError::NoNameservers);
    }

    let query_timeout = options.query_timeout;
    let mut indexed: Vec<(usize, SerialRecord)> =
        stream::iter(servers.iter().enumerate().map(|(index, server)| async move {
            let record = timeout(query_timeout, source.explicit(zone, server))
                .await
                .map_err(|_| SyncError::timeout_on(server.as_str()))??;
            Ok::<_, SyncError>((index, record))
        }))
        .buffer_unordered(options.concurrency.max(1))
        .try_collect()
        .await?;

    // Completion order is arbitrary; report in the order servers were given.
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, record)| record).collect())
}
