// src/enumerate/resolver.rs
// =============================================================================
// The DNS resolution primitive.
//
// The pool only needs "name in, address out". Any failure at all (NXDOMAIN,
// SERVFAIL, timeout, no resolver reachable) is the same thing to the caller:
// the name didn't resolve. Keeping this behind a trait lets tests count
// exactly which names were attempted.
// =============================================================================

use std::net::IpAddr;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("lookup failed: {0}")]
    Lookup(#[from] std::io::Error),

    #[error("no addresses returned")]
    NoAddress,
}

#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self, fqdn: &str) -> Result<IpAddr, ResolveError>;
}

/// Resolves through the operating system's resolver (hosts file, configured
/// nameservers, search domains), the same path `gethostbyname` takes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

#[async_trait]
impl Resolve for SystemResolver {
    async fn resolve(&self, fqdn: &str) -> Result<IpAddr, ResolveError> {
        let addrs: Vec<IpAddr> = tokio::net::lookup_host((fqdn, 0))
            .await?
            .map(|addr| addr.ip())
            .collect();

        pick_address(&addrs).ok_or(ResolveError::NoAddress)
    }
}

// Prefer an IPv4 answer when there is one
fn pick_address(addrs: &[IpAddr]) -> Option<IpAddr> {
    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_ipv4() {
        let addrs: Vec<IpAddr> = vec!["::1".parse().unwrap(), "127.0.0.1".parse().unwrap()];
        assert_eq!(pick_address(&addrs), Some("127.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_falls_back_to_ipv6() {
        let addrs: Vec<IpAddr> = vec!["::1".parse().unwrap()];
        assert_eq!(pick_address(&addrs), Some("::1".parse().unwrap()));
        assert_eq!(pick_address(&[]), None);
    }

    #[tokio::test]
    async fn test_system_resolver_handles_literal_addresses() {
        // An IP literal goes through getaddrinfo without touching the network.
        let ip = SystemResolver.resolve("127.0.0.1").await.unwrap();
        assert_eq!(ip, "127.0.0.1".parse::<IpAddr>().unwrap());
    }
}
