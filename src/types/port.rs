//! TCP port numbers and the port-list notation.
//!
//! A [`PortSpec`] is written as comma-separated entries, each either a single
//! port or an inclusive `first-last` span: `"21-23,80,3306"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// A TCP port number. Port 0 cannot be dialed and is never a `Port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    #[inline]
    pub const fn new(port: u16) -> Option<Self> {
        match port {
            0 => None,
            p => Some(Self(p)),
        }
    }

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u16> for Port {
    type Error = PortError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(PortError::OutOfRange(value))
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl FromStr for Port {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<u16>() {
            Ok(value) => Self::try_from(value),
            Err(_) => Err(PortError::InvalidFormat(s.to_string())),
        }
    }
}

/// Why a port or port list was rejected.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PortError {
    #[error("port {0} is out of valid range (1-65535)")]
    OutOfRange(u16),
    #[error("invalid port number: {0:?}")]
    InvalidFormat(String),
    #[error("port span {0}-{1} runs backwards")]
    InvalidRange(u16, u16),
    #[error("no ports given")]
    Empty,
}

/// One entry of a port list: an inclusive span, possibly of a single port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    first: Port,
    last: Port,
}

impl PortRange {
    pub fn new(first: Port, last: Port) -> Result<Self, PortError> {
        if first > last {
            return Err(PortError::InvalidRange(first.0, last.0));
        }
        Ok(Self { first, last })
    }

    pub const fn single(port: Port) -> Self {
        Self {
            first: port,
            last: port,
        }
    }

    fn span(&self) -> RangeInclusive<u16> {
        self.first.0..=self.last.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Port> {
        // first >= 1, so no value in the span is 0
        self.span().map(Port)
    }
}

impl FromStr for PortRange {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((first, last)) => Self::new(first.parse()?, last.parse()?),
            None => s.parse().map(Self::single),
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// The candidate ports of a scan, as written by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSpec {
    entries: Vec<PortRange>,
}

impl PortSpec {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn add_range(&mut self, range: PortRange) {
        self.entries.push(range);
    }

    pub fn add_port(&mut self, port: Port) {
        self.add_range(PortRange::single(port));
    }

    /// Every port the list names, ascending and without repeats.
    pub fn to_ports(&self) -> Vec<Port> {
        let mut ports: Vec<Port> = self.entries.iter().flat_map(PortRange::iter).collect();
        ports.sort_unstable();
        ports.dedup();
        ports
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ports of the services the classifier and credential probes know about.
    pub fn default_services() -> Self {
        [21, 22, 23, 80, 443, 445, 3306, 8080]
            .into_iter()
            .filter_map(Port::new)
            .map(PortRange::single)
            .collect()
    }
}

impl FromIterator<PortRange> for PortSpec {
    fn from_iter<I: IntoIterator<Item = PortRange>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl FromStr for PortSpec {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(PortError::Empty);
        }
        s.split(',').map(|entry| entry.trim().parse()).collect()
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
