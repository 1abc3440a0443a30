use std::fmt;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::{bail, Result};

/// Immutable description of one scan run: resolved target, inclusive port
/// range, and the per-connection timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRequest {
    pub addr: Ipv4Addr,
    pub from_port: u16,
    pub to_port: u16,
    pub timeout: Duration,
}

impl ScanRequest {
    /// Build a request, rejecting port 0, inverted ranges, and a zero timeout.
    pub fn new(addr: Ipv4Addr, from_port: u16, to_port: u16, timeout: Duration) -> Result<Self> {
        if from_port == 0 {
            bail!("from-port must be at least 1");
        }
        if from_port > to_port {
            bail!("from-port {from_port} cannot be higher than to-port {to_port}");
        }
        if timeout < Duration::from_millis(1) {
            bail!("timeout must be at least 1 millisecond");
        }
        Ok(Self {
            addr,
            from_port,
            to_port,
            timeout,
        })
    }

    /// Number of ports the scan covers; the range is inclusive on both ends.
    pub fn total_ports(&self) -> u64 {
        u64::from(self.to_port) - u64::from(self.from_port) + 1
    }

    pub fn ports(&self) -> RangeInclusive<u16> {
        self.from_port..=self.to_port
    }
}

/// Binary outcome of one probe. Refusals, timeouts, and every other
/// connection failure all land on `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortStatus {
    Open,
    Closed,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortStatus::Open => write!(f, "open"),
            PortStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Outcome of probing a single port, produced exactly once per port.
/// `service` is only ever populated for open ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortResult {
    pub port: u16,
    pub status: PortStatus,
    pub service: Option<String>,
}

impl PortResult {
    pub fn open(port: u16, service: Option<String>) -> Self {
        Self {
            port,
            status: PortStatus::Open,
            service,
        }
    }

    pub fn closed(port: u16) -> Self {
        Self {
            port,
            status: PortStatus::Closed,
            service: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// Events the scheduler emits while the scan runs. `Port` events arrive in
/// completion order, not port order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Port(PortResult),
    Progress {
        finished: u64,
        total: u64,
        remaining: Duration,
    },
}

/// Final snapshot for reporting, taken after every probe has joined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: u64,
    pub finished: u64,
    pub open: Vec<PortResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: Ipv4Addr = Ipv4Addr::LOCALHOST;

    #[test]
    fn request_counts_ports_inclusively() {
        let req = ScanRequest::new(ADDR, 1, 1, Duration::from_millis(100)).unwrap();
        assert_eq!(req.total_ports(), 1);

        let req = ScanRequest::new(ADDR, 1, 65535, Duration::from_millis(100)).unwrap();
        assert_eq!(req.total_ports(), 65535);
        assert_eq!(req.ports().count(), 65535);
    }

    #[test]
    fn request_rejects_inverted_range() {
        let err = ScanRequest::new(ADDR, 100, 50, Duration::from_millis(100));
        assert!(err.is_err());
    }

    #[test]
    fn request_rejects_port_zero_and_zero_timeout() {
        assert!(ScanRequest::new(ADDR, 0, 50, Duration::from_millis(100)).is_err());
        assert!(ScanRequest::new(ADDR, 1, 50, Duration::ZERO).is_err());
    }

    #[test]
    fn open_result_carries_service_closed_does_not() {
        let open = PortResult::open(80, Some("HTTP".into()));
        assert!(open.is_open());
        assert_eq!(open.service.as_deref(), Some("HTTP"));

        let closed = PortResult::closed(81);
        assert!(!closed.is_open());
        assert_eq!(closed.service, None);
    }
}
