//! # sweepd - A Concurrent Network Sweeper
//!
//! sweepd walks every usable address of an IPv4 range, finds the open TCP
//! ports on each host from a candidate list, and identifies the service
//! behind every open port from its banner or its answer to an HTTP probe.
//!
//! ## Features
//!
//! - **Bounded Concurrency**: One socket budget shared by probes and classification
//! - **Service Classification**: Ordered banner rules with an HTTP probe fallback
//! - **Deterministic Results**: Hosts in address order, open ports ascending
//! - **Cancellation**: Ctrl-C keeps every host that already finished
//! - **Multiple Output Formats**: Plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use sweepd::{run_scan, NetworkScanner, ScanConfig, PortSpec};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let scanner = NetworkScanner::new(ScanConfig::new())?;
//!     let ports = "22,80,443".parse::<PortSpec>()?.to_ports();
//!
//!     let record = run_scan(&scanner, "192.168.1.0/24".parse()?, ports).await;
//!     for host in record.hosts.iter().filter(|h| h.has_open_ports()) {
//!         for open in &host.open_ports {
//!             println!("{}:{} {}", host.host_address, open.port, open.service);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Ports, port lists, network ranges and scan ids
//! - [`scanner`] - Port probing, the per-host worker pool and the range driver
//! - [`classifier`] - Service identification for open ports
//! - [`services`] - Hand-off to default-credential probes
//! - [`net`] - The connection seam every dial goes through
//! - [`config`] - Scan configuration and persisted settings
//! - [`report`] - The serializable record of a scan
//! - [`output`] - Plain text, JSON and CSV rendering
//! - [`error`] - Error types

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod net;
pub mod output;
pub mod report;
pub mod scanner;
pub mod services;
pub mod types;

pub use classifier::{ServiceClassifier, ServiceIdentity, ServiceKind, TransportDiagnostic};
pub use config::ScanConfig;
pub use error::ScanError;
pub use report::ScanRecord;
pub use scanner::{run_scan, HostPortScanner, NetworkScanner, OpenPort, PortProbe, ScanResult};
pub use types::{NetworkRange, Port, PortSpec};
