use crate::error::{Result, ScanError};
use futures::future::BoxFuture;
use hickory_resolver::TokioResolver;
use hickory_resolver::config::{NameServerConfig, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::xfer::Protocol;
use rand::seq::SliceRandom;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::debug;

use crate::http::PROBE_TIMEOUT_SECS;

/// Resolvers sampled for every lookup
const RESOLVERS_PER_LOOKUP: usize = 2;

/// Existence check for a hostname, used as a cheap pre-filter before HTTP probing
pub trait NameCheck: Send + Sync {
    fn exists<'a>(&'a self, host: &'a str) -> BoxFuture<'a, bool>;
}

/// DNS existence checker that spreads lookups over a pool of public resolvers
pub struct DnsChecker {
    resolvers: Vec<SocketAddr>,
    timeout: Duration,
}

impl DnsChecker {
    pub fn new(resolvers: Vec<SocketAddr>) -> Result<Self> {
        if resolvers.is_empty() {
            return Err(ScanError::Config("resolver list is empty".to_string()));
        }

        Ok(Self {
            resolvers,
            timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn sample_resolvers(&self) -> Vec<SocketAddr> {
        let mut rng = rand::thread_rng();
        self.resolvers
            .choose_multiple(&mut rng, RESOLVERS_PER_LOOKUP)
            .copied()
            .collect()
    }

    fn build_resolver(&self) -> TokioResolver {
        let mut config = ResolverConfig::new();
        for addr in self.sample_resolvers() {
            config.add_name_server(NameServerConfig::new(addr, Protocol::Udp));
        }

        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        opts.attempts = 1;

        TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build()
    }

    /// Addresses of `host` from two randomly sampled resolvers
    pub async fn lookup(&self, host: &str) -> Result<Vec<IpAddr>> {
        let resolver = self.build_resolver();

        let lookup = tokio::time::timeout(self.timeout, resolver.lookup_ip(host))
            .await
            .map_err(|_| ScanError::Dns(format!("{}: timed out", host)))?
            .map_err(|e| ScanError::Dns(format!("{}: {}", host, e)))?;

        Ok(lookup.iter().collect())
    }

    pub async fn resolves(&self, host: &str) -> bool {
        match self.lookup(host).await {
            Ok(addrs) => !addrs.is_empty(),
            Err(e) => {
                debug!("{}", e);
                false
            }
        }
    }
}

impl NameCheck for DnsChecker {
    fn exists<'a>(&'a self, host: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(self.resolves(host))
    }
}

/// Parse one resolver entry: a bare IP (port 53 implied) or `ip:port`
pub fn parse_resolver(line: &str) -> Option<SocketAddr> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if let Ok(ip) = line.parse::<IpAddr>() {
        return Some(SocketAddr::new(ip, 53));
    }

    line.parse::<SocketAddr>().ok()
}
