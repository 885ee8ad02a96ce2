//! TCP dialing.
//!
//! Every socket the scanner opens goes through a [`Connector`], so the port
//! probe and the classifier can be pointed at test doubles. Connectors only
//! dial; callers bound each attempt with their own timeout.

use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// Opens outbound TCP connections.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Dial `addr`. May block indefinitely; callers wrap this in a timeout.
    async fn connect(&self, addr: SocketAddr) -> io::Result<TcpStream>;
}

/// Dials through the operating system's socket API.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        TcpStream::connect(addr).await
    }
}
