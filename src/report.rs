//! The serializable record of one scan run.

use crate::scanner::ScanResult;
use crate::types::{NetworkRange, Port, ScanId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of scanning one range.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    /// Unique identifier for this scan.
    pub id: ScanId,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// The range that was scanned.
    pub range: NetworkRange,
    /// Candidate ports, in the order they were supplied.
    pub ports: Vec<Port>,
    /// One entry per finished host, in ascending address order.
    pub hosts: Vec<ScanResult>,
    /// The scan was cancelled before covering the whole range.
    pub interrupted: bool,
    pub duration_ms: u64,
}

impl ScanRecord {
    pub fn new(range: NetworkRange, ports: Vec<Port>) -> Self {
        let now = Utc::now();
        Self {
            id: ScanId::new(),
            started_at: now,
            completed_at: now,
            range,
            ports,
            hosts: Vec::new(),
            interrupted: false,
            duration_ms: 0,
        }
    }

    /// Number of hosts with at least one open port.
    pub fn live_hosts(&self) -> usize {
        self.hosts.iter().filter(|h| h.has_open_ports()).count()
    }

    /// Total open ports across all hosts.
    pub fn open_port_count(&self) -> usize {
        self.hosts.iter().map(|h| h.open_ports.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ServiceKind, TransportDiagnostic};
    use crate::scanner::OpenPort;
    use std::net::Ipv4Addr;

    fn record() -> ScanRecord {
        let mut record = ScanRecord::new(
            "192.168.1.0/30".parse().unwrap(),
            vec![Port::new(22).unwrap(), Port::new(9999).unwrap()],
        );
        record.hosts = vec![
            ScanResult {
                host_address: Ipv4Addr::new(192, 168, 1, 1),
                open_ports: vec![
                    OpenPort::new(Port::new(22).unwrap(), ServiceKind::Ssh.into()),
                    OpenPort::new(Port::new(9999).unwrap(), TransportDiagnostic::Timeout.into()),
                ],
            },
            ScanResult {
                host_address: Ipv4Addr::new(192, 168, 1, 2),
                open_ports: Vec::new(),
            },
        ];
        record
    }

    #[test]
    fn test_counts() {
        let record = record();
        assert_eq!(record.live_hosts(), 1);
        assert_eq!(record.open_port_count(), 2);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["range"], "192.168.1.0/30");
        assert_eq!(json["ports"], serde_json::json!([22, 9999]));
        assert_eq!(json["hosts"][0]["host_address"], "192.168.1.1");
        assert_eq!(json["hosts"][0]["open_ports"][0]["service"], "SSH");
        assert_eq!(
            json["hosts"][0]["open_ports"][1]["service"],
            "No Response (Timeout)"
        );
        assert_eq!(json["hosts"][1]["open_ports"], serde_json::json!([]));
        assert_eq!(json["interrupted"], false);
    }
}
