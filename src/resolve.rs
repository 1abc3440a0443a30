use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{anyhow, Context, Result};
use tokio::net::lookup_host;

/// Resolve a target string to its first IPv4 address.
///
/// Literal IPv4 addresses short-circuit without a resolver query. Hostnames
/// go through the system resolver; only V4 answers are considered, matching
/// the single-address scan model.
pub async fn resolve_ipv4(target: &str) -> Result<Ipv4Addr> {
    if let Ok(ip) = target.parse::<Ipv4Addr>() {
        return Ok(ip);
    }

    let addrs = lookup_host((target, 0))
        .await
        .with_context(|| format!("could not resolve target {target}"))?;

    addrs
        .filter_map(|sock| match sock {
            SocketAddr::V4(v4) => Some(*v4.ip()),
            SocketAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| anyhow!("no IPv4 address found for target {target}"))
}
