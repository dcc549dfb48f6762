//! Native serial collection with `hickory-resolver`.
//!
//! Authority discovery mirrors what `dig +nssearch` does: look up the zone's
//! NS records through the system resolver, resolve every nameserver to its
//! addresses, then ask each address for the SOA directly. Servers are
//! identified by the address that answered.

use async_trait::async_trait;
use dnssync_core::{Result, SerialRecord, SyncError};
use futures_util::{stream, StreamExt, TryStreamExt};
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::ProtoErrorKind;
use hickory_resolver::{ResolveError, TokioResolver};
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

use crate::source::SerialSource;

/// Standard DNS port
pub const DNS_PORT: u16 = 53;

/// Serial source that speaks DNS itself
#[derive(Debug, Clone)]
pub struct ResolverSource {
    port: u16,
    timeout: Duration,
    concurrency: usize,
}

impl Default for ResolverSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverSource {
    /// Create a source querying port 53 with a 10 second timeout
    #[must_use]
    pub const fn new() -> Self {
        Self {
            port: DNS_PORT,
            timeout: Duration::from_secs(10),
            concurrency: 8,
        }
    }

    /// Set the port nameservers are queried on
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the timeout for a single query
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many servers are queried at once during discovery
    #[must_use]
    pub const fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    fn options(&self) -> ResolverOpts {
        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        opts.attempts = 1;
        opts
    }

    /// Resolver that only talks to `address`
    fn direct(&self, address: IpAddr) -> TokioResolver {
        TokioResolver::builder_with_config(
            direct_config(address, self.port),
            TokioConnectionProvider::default(),
        )
        .with_options(self.options())
        .build()
    }

    /// Resolver using the host's configuration, for NS and address lookups
    fn system(&self) -> Result<TokioResolver> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| SyncError::Query {
                server: String::from("system resolver"),
                message: e.to_string(),
            })?
            .with_options(self.options())
            .build();
        Ok(resolver)
    }

    /// SOA serial of `zone` as served by `address`
    async fn soa_serial(&self, zone: &str, address: IpAddr, server: &str) -> Result<u32> {
        debug!(zone, %address, "querying SOA");
        let lookup = self
            .direct(address)
            .soa_lookup(zone)
            .await
            .map_err(|e| lookup_error(server, &e))?;

        lookup
            .iter()
            .next()
            .map(|soa| soa.serial())
            .ok_or(SyncError::EmptyAnswer)
    }

    /// Addresses for `server`, which may already be an address
    async fn addresses(&self, server: &str) -> Result<Vec<IpAddr>> {
        if let Ok(ip) = server.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }
        let lookup = self
            .system()?
            .lookup_ip(server)
            .await
            .map_err(|e| lookup_error(server, &e))?;
        Ok(lookup.iter().collect())
    }
}

#[async_trait]
impl SerialSource for ResolverSource {
    fn name(&self) -> &'static str {
        "resolver"
    }

    async fn authority(&self, zone: &str) -> Result<Vec<SerialRecord>> {
        let nameservers: Vec<String> = self
            .system()?
            .ns_lookup(zone)
            .await
            .map_err(|e| lookup_error(zone, &e))?
            .iter()
            .map(|ns| ns.0.to_string())
            .collect();
        debug!(zone, ?nameservers, "discovered nameservers");
        if nameservers.is_empty() {
            return Err(SyncError::EmptyAnswer);
        }

        let mut targets = Vec::new();
        for nameserver in &nameservers {
            targets.extend(self.addresses(nameserver).await?);
        }

        let mut indexed: Vec<(usize, SerialRecord)> =
            stream::iter(targets.into_iter().enumerate().map(|(index, address)| async move {
                let server = address.to_string();
                let serial = self.soa_serial(zone, address, &server).await?;
                Ok::<_, SyncError>((index, SerialRecord::new(server, serial)))
            }))
            .buffer_unordered(self.concurrency.max(1))
            .try_collect()
            .await?;

        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, record)| record).collect())
    }

    async fn explicit(&self, zone: &str, server: &str) -> Result<SerialRecord> {
        let address = self
            .addresses(server)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::Query {
                server: server.to_string(),
                message: String::from("no address found"),
            })?;
        let serial = self.soa_serial(zone, address, server).await?;
        Ok(SerialRecord::new(server, serial))
    }
}

/// Configuration pointing at a single server over UDP and TCP.
fn direct_config(address: IpAddr, port: u16) -> ResolverConfig {
    ResolverConfig::from_parts(
        None,
        Vec::new(),
        NameServerConfigGroup::from_ips_clear(&[address], port, true),
    )
}

/// Map a resolver failure onto the check's error taxonomy.
fn lookup_error(server: &str, error: &ResolveError) -> SyncError {
    if error.is_nx_domain() || error.is_no_records_found() {
        SyncError::EmptyAnswer
    } else if error
        .proto()
        .is_some_and(|proto| matches!(proto.kind(), ProtoErrorKind::Timeout))
    {
        SyncError::timeout_on(server)
    } else {
        SyncError::Query {
            server: server.to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::op::{Query, ResponseCode};
    use hickory_resolver::proto::rr::{Name, RecordType};
    use hickory_resolver::proto::ProtoError;
    use std::net::{Ipv4Addr, SocketAddr};

    fn no_records(code: ResponseCode) -> ResolveError {
        let query = Query::query(Name::from_ascii("example.org.").unwrap(), RecordType::SOA);
        ProtoError::nx_error(Box::new(query), None, None, None, code, false, None).into()
    }

    #[test]
    fn direct_config_targets_only_the_server() {
        let address = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 53));
        let config = direct_config(address, 5353);
        assert!(!config.name_servers().is_empty());
        assert!(config
            .name_servers()
            .iter()
            .all(|ns| ns.socket_addr == SocketAddr::new(address, 5353)));
    }

    #[test]
    fn builder_settings() {
        let source = ResolverSource::new()
            .port(5353)
            .timeout(Duration::from_secs(2))
            .concurrency(3);
        assert_eq!(source.port, 5353);
        assert_eq!(source.concurrency, 3);
        let opts = source.options();
        assert_eq!(opts.timeout, Duration::from_secs(2));
        assert_eq!(opts.attempts, 1);
    }

    #[tokio::test]
    async fn literal_addresses_skip_resolution() {
        let source = ResolverSource::new();
        let addresses = source.addresses("2001:db8::53").await.unwrap();
        assert_eq!(addresses, ["2001:db8::53".parse::<IpAddr>().unwrap()]);
    }

    #[test]
    fn timeouts_name_the_server() {
        let error = ResolveError::from(ProtoError::from(ProtoErrorKind::Timeout));
        assert!(matches!(
            lookup_error("ns1", &error),
            SyncError::Timeout { server: Some(server) } if server == "ns1"
        ));
    }

    #[test]
    fn missing_zone_is_an_empty_answer() {
        for code in [ResponseCode::NXDomain, ResponseCode::NoError] {
            assert!(matches!(
                lookup_error("ns1", &no_records(code)),
                SyncError::EmptyAnswer
            ));
        }
    }

    #[test]
    fn other_failures_keep_the_message() {
        let error = ResolveError::from("boom");
        match lookup_error("ns1", &error) {
            SyncError::Query { server, message } => {
                assert_eq!(server, "ns1");
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn timeout_wording_alone_is_not_a_timeout() {
        let error = ResolveError::from("request timed out");
        assert!(matches!(lookup_error("ns1", &error), SyncError::Query { .. }));
    }
}
