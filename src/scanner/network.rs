//! Range-wide scanning.

use super::host::HostPortScanner;
use super::probe::PortProbe;
use super::{OpenPort, ScanResult};
use crate::classifier::{ServiceClassifier, ServiceIdentity, TransportDiagnostic};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::net::{Connector, TcpConnector};
use crate::services::ServiceProbes;
use crate::types::{NetworkRange, Port};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Scans every usable address of a range and classifies what it finds.
///
/// Hosts are reported in ascending address order. By default they are
/// scanned one after another; `host_concurrency` overlaps several hosts while
/// still preserving that order. Probes and classifications of every host draw
/// from one budget of `max_workers` sockets.
pub struct NetworkScanner {
    config: ScanConfig,
    ports: HostPortScanner,
    classifier: ServiceClassifier,
    services: ServiceProbes,
    budget: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl NetworkScanner {
    /// Create a scanner that dials real TCP connections.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        Self::with_connector(config, Arc::new(TcpConnector))
    }

    /// Create a scanner that dials through `connector`.
    pub fn with_connector(config: ScanConfig, connector: Arc<dyn Connector>) -> Result<Self, ScanError> {
        config.validate()?;

        let cancel = CancellationToken::new();
        let budget = Arc::new(Semaphore::new(config.max_workers));

        let probe = PortProbe::new(connector.clone(), &config).with_cancellation(cancel.clone());
        let ports = HostPortScanner::with_budget(Arc::new(probe), budget.clone(), config.max_workers);
        let classifier = ServiceClassifier::new(connector, &config).with_cancellation(cancel.clone());

        Ok(Self {
            config,
            ports,
            classifier,
            services: ServiceProbes::new(),
            budget,
            cancel,
        })
    }

    /// Use `services` for the default-credential hand-off.
    pub fn with_services(mut self, services: ServiceProbes) -> Self {
        self.services = services;
        self
    }

    /// Token that stops the scan when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Scan `ports` on every usable host of `range`.
    ///
    /// After cancellation the result holds the hosts that finished before it,
    /// always a prefix of the range in address order.
    pub async fn scan(&self, range: &NetworkRange, ports: &[Port]) -> Vec<ScanResult> {
        let progress = self.progress_bar(range);

        let mut hosts = stream::iter(range.hosts())
            .map(|host| self.scan_host(host, ports, &progress))
            .buffered(self.config.host_concurrency);

        let mut results = Vec::new();
        while let Some(result) = hosts.next().await {
            match result {
                Some(result) => results.push(result),
                None => break,
            }
        }

        progress.finish_and_clear();
        if self.is_cancelled() {
            warn!(completed = results.len(), "scan interrupted");
        }
        results
    }

    async fn scan_host(&self, host: Ipv4Addr, ports: &[Port], progress: &ProgressBar) -> Option<ScanResult> {
        if self.is_cancelled() {
            return None;
        }

        if self.config.verbose {
            info!(host = %host, "scanning host");
        } else {
            progress.set_message(format!("Scanning address: {host}"));
        }

        let mut open = self.ports.scan_ports(host, ports).await;
        open.sort_unstable();

        let open_ports: Vec<OpenPort> = stream::iter(open)
            .map(|port| self.identify(host, port))
            .buffered(self.config.max_workers)
            .collect()
            .await;

        progress.inc(1);

        // A host interrupted part-way may be missing open ports.
        if self.is_cancelled() {
            return None;
        }

        Some(ScanResult {
            host_address: host,
            open_ports,
        })
    }

    async fn identify(&self, host: Ipv4Addr, port: Port) -> OpenPort {
        let service = match self.budget.acquire().await {
            Ok(_permit) => self.classifier.classify(host, port).await,
            Err(_) => TransportDiagnostic::Cancelled.into(),
        };

        if self.config.verbose {
            info!(host = %host, port = port.as_u16(), service = %service, "open port");
        }

        let default_credentials = self.check_credentials(host, port, &service).await;
        OpenPort {
            port,
            service,
            default_credentials,
        }
    }

    /// Hand a recognized service to its credential probe, once.
    async fn check_credentials(&self, host: Ipv4Addr, port: Port, service: &ServiceIdentity) -> Option<bool> {
        if !self.config.check_credentials {
            return None;
        }
        let kind = service.kind()?;
        let probe = self.services.get(kind)?;

        let attempt = probe.attempt_default_credentials(host, port.as_u16());
        match timeout(self.config.credential_timeout, attempt).await {
            Ok(accepted) => {
                if accepted {
                    info!(host = %host, port = port.as_u16(), service = %kind, "default credentials accepted");
                }
                Some(accepted)
            }
            Err(_) => {
                warn!(host = %host, port = port.as_u16(), service = %kind, "credential probe timed out");
                None
            }
        }
    }

    fn progress_bar(&self, range: &NetworkRange) -> ProgressBar {
        if self.config.verbose || !self.config.progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(range.host_count());
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos}/{len} {msg}") {
            pb.set_style(style);
        }
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ServiceKind;
    use crate::net::testing::{serve, Behaviour, BlackholeConnector, MappedConnector};
    use crate::services::CredentialProbe;
    use async_trait::async_trait;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    fn config() -> ScanConfig {
        ScanConfig::new()
            .with_progress(false)
            .with_probe_timeout(Duration::from_millis(200))
            .with_connect_timeout(Duration::from_millis(500))
            .with_read_timeout(Duration::from_millis(200))
    }

    fn ports(list: &[u16]) -> Vec<Port> {
        list.iter().copied().filter_map(Port::new).collect()
    }

    fn at(host: [u8; 4], port: u16) -> SocketAddr {
        SocketAddr::from((host, port))
    }

    async fn ssh_lab() -> MappedConnector {
        let ssh = serve(Behaviour::Banner(b"SSH-2.0-OpenSSH_8.9\r\n".to_vec())).await;
        MappedConnector::new().route(at([192, 168, 1, 1], 22), ssh)
    }

    #[tokio::test]
    async fn test_two_host_range_end_to_end() {
        let scanner = NetworkScanner::with_connector(config(), Arc::new(ssh_lab().await)).unwrap();
        let range: NetworkRange = "192.168.1.0/30".parse().unwrap();

        let results = scanner.scan(&range, &ports(&[22, 9999])).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].host_address, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(
            results[0].open_ports,
            vec![OpenPort::new(Port::new(22).unwrap(), ServiceKind::Ssh.into())]
        );
        assert_eq!(results[1].host_address, Ipv4Addr::new(192, 168, 1, 2));
        assert!(results[1].open_ports.is_empty());
    }

    #[tokio::test]
    async fn test_repeat_scans_agree() {
        let scanner = NetworkScanner::with_connector(config(), Arc::new(ssh_lab().await)).unwrap();
        let range: NetworkRange = "192.168.1.0/29".parse().unwrap();
        let candidates = ports(&[21, 22, 80, 9999]);

        let first = scanner.scan(&range, &candidates).await;
        let second = scanner.scan(&range, &candidates).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_parallel_hosts_keep_address_order() {
        let http = serve(Behaviour::Respond(b"HTTP/1.1 200 OK\r\n\r\n".to_vec())).await;
        let connector = ssh_lab().await.route(at([192, 168, 1, 5], 80), http);
        let config = config().with_host_concurrency(4);
        let scanner = NetworkScanner::with_connector(config, Arc::new(connector)).unwrap();
        let range: NetworkRange = "192.168.1.0/29".parse().unwrap();

        let results = scanner.scan(&range, &ports(&[22, 80])).await;

        let order: Vec<Ipv4Addr> = results.iter().map(|r| r.host_address).collect();
        assert_eq!(order, range.hosts().collect::<Vec<_>>());
        assert_eq!(results[0].open_ports[0].service, ServiceKind::Ssh.into());
        assert_eq!(results[4].open_ports[0].service, ServiceKind::Http.into());
        let open_hosts = results.iter().filter(|r| r.has_open_ports()).count();
        assert_eq!(open_hosts, 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_returns_nothing() {
        let scanner = NetworkScanner::with_connector(config(), Arc::new(MappedConnector::new())).unwrap();
        scanner.cancellation_token().cancel();

        let range: NetworkRange = "10.0.0.0/24".parse().unwrap();
        assert!(scanner.scan(&range, &ports(&[22])).await.is_empty());
        assert!(scanner.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_mid_scan_keeps_finished_prefix() {
        let config = config().with_probe_timeout(Duration::from_millis(100));
        let scanner = Arc::new(NetworkScanner::with_connector(config, Arc::new(BlackholeConnector)).unwrap());
        let token = scanner.cancellation_token();
        let range: NetworkRange = "10.0.0.0/28".parse().unwrap();

        let task = {
            let scanner = scanner.clone();
            tokio::spawn(async move { scanner.scan(&range, &ports(&[22])).await })
        };
        tokio::time::sleep(Duration::from_millis(250)).await;
        let cancelled_at = Instant::now();
        token.cancel();

        let results = task.await.unwrap();
        assert!(cancelled_at.elapsed() < Duration::from_millis(200));
        assert!(results.len() < 14);
        for (result, expected) in results.iter().zip(range.hosts()) {
            assert_eq!(result.host_address, expected);
        }
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = config().with_max_workers(0);
        assert!(matches!(
            NetworkScanner::new(config),
            Err(ScanError::InvalidConfig(_))
        ));
    }

    struct CountingProbe {
        calls: AtomicUsize,
        answer: bool,
        delay: Duration,
    }

    impl CountingProbe {
        fn new(answer: bool, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                answer,
                delay,
            })
        }
    }

    #[async_trait]
    impl CredentialProbe for CountingProbe {
        async fn attempt_default_credentials(&self, _host: Ipv4Addr, _port: u16) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.answer
        }
    }

    #[tokio::test]
    async fn test_recognized_service_is_handed_off_once() {
        let probe = CountingProbe::new(true, Duration::ZERO);
        let config = config().with_credential_checks(Duration::from_secs(1));
        let scanner = NetworkScanner::with_connector(config, Arc::new(ssh_lab().await))
            .unwrap()
            .with_services(ServiceProbes::new().register(ServiceKind::Ssh, probe.clone()));
        let range: NetworkRange = "192.168.1.0/30".parse().unwrap();

        let results = scanner.scan(&range, &ports(&[22])).await;

        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
        assert_eq!(results[0].open_ports[0].default_credentials, Some(true));
    }

    #[tokio::test]
    async fn test_credential_checks_off_by_default() {
        let probe = CountingProbe::new(true, Duration::ZERO);
        let scanner = NetworkScanner::with_connector(config(), Arc::new(ssh_lab().await))
            .unwrap()
            .with_services(ServiceProbes::new().register(ServiceKind::Ssh, probe.clone()));
        let range: NetworkRange = "192.168.1.0/30".parse().unwrap();

        let results = scanner.scan(&range, &ports(&[22])).await;

        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(results[0].open_ports[0].default_credentials, None);
    }

    #[tokio::test]
    async fn test_slow_credential_probe_is_abandoned() {
        let probe = CountingProbe::new(true, Duration::from_secs(30));
        let config = config().with_credential_checks(Duration::from_millis(100));
        let scanner = NetworkScanner::with_connector(config, Arc::new(ssh_lab().await))
            .unwrap()
            .with_services(ServiceProbes::new().register(ServiceKind::Ssh, probe.clone()));
        let range: NetworkRange = "192.168.1.1/32".parse().unwrap();

        let start = Instant::now();
        let results = scanner.scan(&range, &ports(&[22])).await;

        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
        assert_eq!(results[0].open_ports[0].service, ServiceKind::Ssh.into());
        assert_eq!(results[0].open_ports[0].default_credentials, None);
    }
}
