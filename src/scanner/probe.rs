//! TCP connect probe.
//!
//! Decides whether a single port accepts connections by completing a TCP
//! handshake within a timeout. No privileges are needed, and the probe
//! cannot tell a filtered port from a closed one when the caller only asks
//! for a boolean.

use super::rate_limiter::RateLimiter;
use crate::config::ScanConfig;
use crate::net::Connector;
use crate::types::Port;
use serde::Serialize;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Raw outcome of a connect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// The handshake completed.
    Open,
    /// The attempt failed: refused, unreachable, or cancelled.
    Closed,
    /// No answer before the timeout.
    Filtered,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
        }
    }
}

/// Connect-based open/closed check for one port at a time.
pub struct PortProbe {
    connector: Arc<dyn Connector>,
    timeout: Duration,
    verbose: bool,
    rate_limiter: Option<RateLimiter>,
    cancel: CancellationToken,
}

impl PortProbe {
    pub fn new(connector: Arc<dyn Connector>, config: &ScanConfig) -> Self {
        Self {
            connector,
            timeout: config.probe_timeout,
            verbose: config.verbose,
            rate_limiter: RateLimiter::new(config.rate_limit),
            cancel: CancellationToken::new(),
        }
    }

    /// Stop probing when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns `true` iff the handshake completed before the timeout.
    ///
    /// Every failure, including a timeout, counts as closed.
    pub async fn is_open(&self, host: Ipv4Addr, port: Port) -> bool {
        self.probe(host, port).await == PortState::Open
    }

    /// Attempt a connection and report how it ended.
    pub async fn probe(&self, host: Ipv4Addr, port: Port) -> PortState {
        if self.cancel.is_cancelled() {
            return PortState::Closed;
        }

        if let Some(limiter) = &self.rate_limiter {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return PortState::Closed,
                _ = limiter.wait() => {}
            }
        }

        let addr = SocketAddr::new(host.into(), port.as_u16());
        let state = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => PortState::Closed,
            attempt = timeout(self.timeout, self.connector.connect(addr)) => match attempt {
                Ok(Ok(_stream)) => PortState::Open,
                Ok(Err(e)) => {
                    trace!(%addr, error = %e, "connect failed");
                    PortState::Closed
                }
                Err(_) => PortState::Filtered,
            },
        };

        let outcome = if state == PortState::Open { "opened" } else { "closed" };
        if self.verbose {
            info!(host = %host, state = %state, "{port} : {outcome}");
        } else {
            debug!(host = %host, state = %state, "{port} : {outcome}");
        }

        state
    }
}
