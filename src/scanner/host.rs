//! Per-host port fan-out.
//!
//! Probes every candidate port of one host concurrently, never running more
//! than the worker budget at once. Completions stream back into a single
//! collector, so the open-port set needs no lock.

use super::probe::PortProbe;
use crate::types::Port;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Finds the open ports of a single host.
pub struct HostPortScanner {
    probe: Arc<PortProbe>,
    budget: Arc<Semaphore>,
    max_workers: usize,
}

impl HostPortScanner {
    /// Create a scanner with its own budget of `max_workers` concurrent probes.
    pub fn new(probe: Arc<PortProbe>, max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self::with_budget(probe, Arc::new(Semaphore::new(max_workers)), max_workers)
    }

    /// Create a scanner drawing permits from a budget shared with other work.
    pub fn with_budget(probe: Arc<PortProbe>, budget: Arc<Semaphore>, max_workers: usize) -> Self {
        Self {
            probe,
            budget,
            max_workers: max_workers.max(1),
        }
    }

    /// Probe `ports` on `host` and return the ones that accepted a connection.
    ///
    /// Ports come back in completion order, each at most once.
    pub async fn scan_ports(&self, host: Ipv4Addr, ports: &[Port]) -> Vec<Port> {
        let mut completions = stream::iter(ports.iter().copied())
            .map(|port| {
                let probe = &self.probe;
                let budget = &self.budget;
                async move {
                    // A closed semaphore means the scan is being torn down.
                    let _permit = budget.acquire().await.ok()?;
                    probe.is_open(host, port).await.then_some(port)
                }
            })
            .buffer_unordered(self.max_workers);

        let mut seen = HashSet::new();
        let mut open = Vec::new();
        while let Some(result) = completions.next().await {
            if let Some(port) = result {
                if seen.insert(port) {
                    open.push(port);
                }
            }
        }

        open
    }
}
