//! Service classification for open ports.
//!
//! The classifier opens its own connection to an open port and works through
//! three stages on that one socket:
//! 1. Wait briefly for an unsolicited banner and match it against the
//!    ordered [`rules::BANNER_RULES`].
//! 2. If nothing (or nothing but EOF) arrives, send a minimal HTTP request.
//! 3. Classify whatever comes back.
//!
//! Every blocking step carries a timeout, so one classification never takes
//! longer than the connect timeout plus two read timeouts. Failures are
//! returned as [`ServiceIdentity::TransportDiagnostic`] values and never
//! escape as errors.

pub mod banner;
mod identity;
pub mod rules;

pub use identity::{classify_transport_error, ServiceIdentity, ServiceKind, TransportDiagnostic};

use crate::config::ScanConfig;
use crate::net::Connector;
use crate::types::Port;
use banner::{HTTP_PROBE, MAX_BANNER_SIZE};
use rules::{classify_banner, classify_probe_response};
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Identifies the service behind an open TCP port.
pub struct ServiceClassifier {
    connector: Arc<dyn Connector>,
    connect_timeout: Duration,
    read_timeout: Duration,
    cancel: CancellationToken,
}

impl ServiceClassifier {
    pub fn new(connector: Arc<dyn Connector>, config: &ScanConfig) -> Self {
        Self {
            connector,
            connect_timeout: config.connect_timeout,
            read_timeout: config.read_timeout,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort in-flight classifications when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Classify the service on `host:port`.
    pub async fn classify(&self, host: Ipv4Addr, port: Port) -> ServiceIdentity {
        if self.cancel.is_cancelled() {
            return TransportDiagnostic::Cancelled.into();
        }

        let addr = SocketAddr::new(host.into(), port.as_u16());
        let identity: ServiceIdentity = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => TransportDiagnostic::Cancelled.into(),
            identity = self.identify(addr) => identity,
        };

        debug!(%addr, service = %identity, "classified");
        identity
    }

    async fn identify(&self, addr: SocketAddr) -> ServiceIdentity {
        let mut stream = match timeout(self.connect_timeout, self.connector.connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return classify_transport_error(&e).into(),
            Err(_) => return TransportDiagnostic::Timeout.into(),
        };

        let mut buffer = vec![0u8; MAX_BANNER_SIZE];

        match timeout(self.read_timeout, stream.read(&mut buffer)).await {
            Ok(Ok(0)) => trace!(%addr, "empty banner, sending probe"),
            Ok(Ok(n)) => return classify_banner(&buffer[..n]),
            Ok(Err(e)) => return classify_transport_error(&e).into(),
            Err(_) => trace!(%addr, "no banner before timeout, sending probe"),
        }

        match timeout(self.read_timeout, exchange_probe(&mut stream, &mut buffer)).await {
            Ok(Ok(n)) => classify_probe_response(&buffer[..n]),
            Ok(Err(e)) => classify_transport_error(&e).into(),
            Err(_) => TransportDiagnostic::Timeout.into(),
        }
    }
}

/// Send the HTTP probe and read one response chunk.
async fn exchange_probe(stream: &mut TcpStream, buffer: &mut [u8]) -> io::Result<usize> {
    stream.write_all(HTTP_PROBE).await?;
    stream.read(buffer).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::testing::{closed_addr, serve, BlackholeConnector, Behaviour, MappedConnector};
    use crate::net::TcpConnector;
    use std::time::Instant;

    const LOCALHOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

    fn config() -> ScanConfig {
        ScanConfig::new()
            .with_connect_timeout(Duration::from_millis(500))
            .with_read_timeout(Duration::from_millis(200))
    }

    fn classifier() -> ServiceClassifier {
        ServiceClassifier::new(Arc::new(TcpConnector), &config())
    }

    fn port_of(addr: SocketAddr) -> Port {
        Port::new(addr.port()).unwrap()
    }

    async fn classify(behaviour: Behaviour) -> ServiceIdentity {
        let addr = serve(behaviour).await;
        classifier().classify(LOCALHOST, port_of(addr)).await
    }

    #[tokio::test]
    async fn test_ssh_banner() {
        let identity = classify(Behaviour::Banner(b"SSH-2.0-OpenSSH_8.9\r\n".to_vec())).await;
        assert_eq!(identity, ServiceIdentity::Recognized(ServiceKind::Ssh));
    }

    #[tokio::test]
    async fn test_rule_order_over_the_wire() {
        let identity = classify(Behaviour::Banner(b"FTP HTTP ready".to_vec())).await;
        assert_eq!(identity, ServiceIdentity::Recognized(ServiceKind::Ftp));
    }

    #[tokio::test]
    async fn test_telnet_negotiation_bytes() {
        let identity = classify(Behaviour::Banner(b"\xff\xfd\x01".to_vec())).await;
        assert_eq!(identity, ServiceIdentity::Recognized(ServiceKind::Telnet));
    }

    #[tokio::test]
    async fn test_mysql_plugin_token() {
        let upper = classify(Behaviour::Banner(b"CACHING_SHA2_PASSWORD".to_vec())).await;
        let lower = classify(Behaviour::Banner(b"caching_sha2_password".to_vec())).await;
        assert_eq!(upper, ServiceIdentity::Recognized(ServiceKind::MySql));
        assert_eq!(lower, ServiceIdentity::Recognized(ServiceKind::MySql));
    }

    #[tokio::test]
    async fn test_unknown_banner_is_reported_verbatim() {
        let identity = classify(Behaviour::Banner(b"* OK IMAP4rev1 ready\r\n".to_vec())).await;
        assert_eq!(identity.to_string(), "Banner Detected: * OK IMAP4rev1 ready");
    }

    #[tokio::test]
    async fn test_quiet_http_server_answers_probe() {
        let identity = classify(Behaviour::Respond(b"HTTP/1.1 200 OK\r\n\r\n".to_vec())).await;
        assert_eq!(identity, ServiceIdentity::Recognized(ServiceKind::Http));
    }

    #[tokio::test]
    async fn test_not_implemented_answer_is_http() {
        let identity = classify(Behaviour::Respond(b"501 Not Implemented\r\n".to_vec())).await;
        assert_eq!(identity, ServiceIdentity::Recognized(ServiceKind::Http));
    }

    #[tokio::test]
    async fn test_unrecognized_answer_is_unknown_service() {
        let identity = classify(Behaviour::Respond(b"-ERR wrong protocol\r\n".to_vec())).await;
        assert_eq!(identity, ServiceIdentity::ProtocolFallback);
    }

    #[tokio::test]
    async fn test_silent_service_times_out() {
        let start = Instant::now();
        let identity = classify(Behaviour::Silent).await;
        assert_eq!(identity, TransportDiagnostic::Timeout.into());
        assert!(start.elapsed() < config().classification_budget() + Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_accept_and_close_stays_bounded() {
        let start = Instant::now();
        let identity = classify(Behaviour::Close).await;
        assert!(identity.kind().is_none());
        assert!(start.elapsed() < config().classification_budget() + Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_refused_connection() {
        let addr = closed_addr().await;
        let identity = classifier().classify(LOCALHOST, port_of(addr)).await;
        assert_eq!(identity, ServiceIdentity::from(TransportDiagnostic::Refused));
    }

    #[tokio::test]
    async fn test_connect_timeout() {
        let classifier = ServiceClassifier::new(Arc::new(BlackholeConnector), &config());
        let start = Instant::now();
        let identity = classifier.classify(LOCALHOST, Port::new(22).unwrap()).await;
        assert_eq!(identity, ServiceIdentity::from(TransportDiagnostic::Timeout));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let classifier =
            ServiceClassifier::new(Arc::new(MappedConnector::new()), &config()).with_cancellation(token);
        let identity = classifier.classify(LOCALHOST, Port::new(22).unwrap()).await;
        assert_eq!(identity, ServiceIdentity::from(TransportDiagnostic::Cancelled));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_blocked_dial() {
        let token = CancellationToken::new();
        let classifier = ServiceClassifier::new(Arc::new(BlackholeConnector), &config())
            .with_cancellation(token.clone());

        let handle = tokio::spawn(async move {
            classifier.classify(LOCALHOST, Port::new(22).unwrap()).await
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        let identity = handle.await.unwrap();
        assert_eq!(identity, ServiceIdentity::from(TransportDiagnostic::Cancelled));
    }
}
