//! Scanner module: coordinates probing and classification across a range.
//!
//! Data flows one way:
//! [`NetworkScanner`] → [`HostPortScanner`] → [`PortProbe`], then
//! [`ServiceClassifier`](crate::classifier::ServiceClassifier) for every open
//! port, then optionally a registered
//! [`CredentialProbe`](crate::services::CredentialProbe).

mod host;
mod network;
pub mod probe;
pub mod rate_limiter;

pub use host::HostPortScanner;
pub use network::NetworkScanner;
pub use probe::{PortProbe, PortState};
pub use rate_limiter::RateLimiter;

use crate::classifier::ServiceIdentity;
use crate::report::ScanRecord;
use crate::types::{NetworkRange, Port};
use chrono::Utc;
use serde::Serialize;
use std::net::Ipv4Addr;
use std::time::Instant;

/// An open port and what runs on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenPort {
    pub port: Port,
    pub service: ServiceIdentity,
    /// Outcome of the credential hand-off, when one ran to completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_credentials: Option<bool>,
}

impl OpenPort {
    pub fn new(port: Port, service: ServiceIdentity) -> Self {
        Self {
            port,
            service,
            default_credentials: None,
        }
    }
}

/// Everything learned about one host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    pub host_address: Ipv4Addr,
    /// Open ports in ascending order.
    pub open_ports: Vec<OpenPort>,
}

impl ScanResult {
    pub fn has_open_ports(&self) -> bool {
        !self.open_ports.is_empty()
    }
}

/// Scan `range` and wrap the outcome in a timestamped record.
pub async fn run_scan(scanner: &NetworkScanner, range: NetworkRange, ports: Vec<Port>) -> ScanRecord {
    let mut record = ScanRecord::new(range, ports);
    let start = Instant::now();

    record.hosts = scanner.scan(&record.range, &record.ports).await;

    record.interrupted = scanner.is_cancelled();
    record.completed_at = Utc::now();
    record.duration_ms = start.elapsed().as_millis() as u64;
    record
}
