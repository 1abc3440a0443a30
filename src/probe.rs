use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;

use crate::catalog::ServiceCatalog;
use crate::types::PortResult;

/// Attempt one TCP connect to `addr` within `timeout` and classify the port.
///
/// Anything short of a completed handshake counts as `Closed`: refusals,
/// unreachable networks, and the timeout itself all fold into the same
/// outcome. A successful stream is dropped right away, and an expired
/// timeout drops the pending connect future, so no socket outlives the call.
pub async fn probe_port(
    addr: SocketAddr,
    timeout: Duration,
    catalog: &ServiceCatalog,
) -> PortResult {
    let port = addr.port();
    match time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            PortResult::open(port, catalog.describe(port).map(str::to_owned))
        }
        _ => PortResult::closed(port),
    }
}
