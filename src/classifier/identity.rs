//! Classification outcomes.

use serde::{Serialize, Serializer};
use std::fmt;
use std::io;

/// Services the banner rules can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Ssh,
    Ftp,
    Telnet,
    MySql,
    Http,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ssh => write!(f, "SSH"),
            Self::Ftp => write!(f, "FTP"),
            Self::Telnet => write!(f, "Telnet"),
            Self::MySql => write!(f, "MySQL"),
            Self::Http => write!(f, "HTTP"),
        }
    }
}

/// Why the classifier could not talk to an open port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportDiagnostic {
    /// A connect or read exceeded its timeout.
    Timeout,
    /// The remote end refused the connection.
    Refused,
    /// The scan was cancelled before classification finished.
    Cancelled,
    /// Any other socket failure, with its message.
    Other(String),
}

impl fmt::Display for TransportDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "No Response (Timeout)"),
            Self::Refused => write!(f, "Connection Refused"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Other(detail) => write!(f, "Error: {detail}"),
        }
    }
}

/// Map a socket error onto a diagnostic.
///
/// New error kinds land in `Other` unless they are listed here on purpose.
pub fn classify_transport_error(err: &io::Error) -> TransportDiagnostic {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TransportDiagnostic::Timeout,
        io::ErrorKind::ConnectionRefused => TransportDiagnostic::Refused,
        _ => TransportDiagnostic::Other(err.to_string()),
    }
}

/// The single outcome of classifying one open port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceIdentity {
    /// A banner or probe response matched a known service.
    Recognized(ServiceKind),
    /// The service sent a banner that matched no rule.
    BannerFallback(String),
    /// The service answered, or stayed quiet, without revealing itself.
    ProtocolFallback,
    /// The connection failed before anything could be learned.
    TransportDiagnostic(TransportDiagnostic),
}

impl ServiceIdentity {
    pub fn kind(&self) -> Option<ServiceKind> {
        match self {
            Self::Recognized(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::TransportDiagnostic(_))
    }
}

impl From<ServiceKind> for ServiceIdentity {
    fn from(kind: ServiceKind) -> Self {
        Self::Recognized(kind)
    }
}

impl From<TransportDiagnostic> for ServiceIdentity {
    fn from(diagnostic: TransportDiagnostic) -> Self {
        Self::TransportDiagnostic(diagnostic)
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recognized(kind) => write!(f, "{kind}"),
            Self::BannerFallback(text) => write!(f, "Banner Detected: {text}"),
            Self::ProtocolFallback => write!(f, "Unknown Service"),
            Self::TransportDiagnostic(diagnostic) => write!(f, "{diagnostic}"),
        }
    }
}

impl Serialize for ServiceIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
