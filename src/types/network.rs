//! IPv4 network ranges.
//!
//! A `NetworkRange` is parsed from CIDR notation and iterated to produce the
//! usable host addresses of the block, in ascending numeric order.

use ipnetwork::Ipv4Network;
use serde::{Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Error type for range parsing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RangeError {
    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),
    #[error("only IPv4 ranges are supported: {0}")]
    NotIpv4(String),
    #[error("CIDR range too large: {0} addresses (max: {1})")]
    TooLarge(u64, u64),
}

/// An immutable IPv4 CIDR block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkRange {
    net: Ipv4Network,
}

impl NetworkRange {
    /// Maximum number of addresses accepted in one range (a /16).
    pub const MAX_ADDRESSES: u64 = 65536;

    pub fn new(net: Ipv4Network) -> Result<Self, RangeError> {
        let size = block_size(net.prefix());
        if size > Self::MAX_ADDRESSES {
            return Err(RangeError::TooLarge(size, Self::MAX_ADDRESSES));
        }
        Ok(Self { net })
    }

    pub fn prefix(&self) -> u8 {
        self.net.prefix()
    }

    /// Iterate the usable host addresses in ascending order.
    ///
    /// Network and broadcast addresses are excluded for prefixes up to /30.
    /// A /31 yields both of its addresses and a /32 yields its single address.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> {
        let first = u32::from(self.net.network());
        let last = u32::from(self.net.broadcast());
        let (first, last) = if self.net.prefix() <= 30 {
            (first + 1, last - 1)
        } else {
            (first, last)
        };
        (first..=last).map(Ipv4Addr::from)
    }

    /// Number of addresses [`hosts`](Self::hosts) yields.
    pub fn host_count(&self) -> u64 {
        match self.net.prefix() {
            32 => 1,
            31 => 2,
            p => block_size(p) - 2,
        }
    }
}

fn block_size(prefix: u8) -> u64 {
    1u64 << (32 - u32::from(prefix.min(32)))
}

impl FromStr for NetworkRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let net = match s.split_once('/') {
            Some((addr, _)) => {
                if addr.contains(':') {
                    return Err(RangeError::NotIpv4(s.to_string()));
                }
                s.parse::<Ipv4Network>()
                    .map_err(|_| RangeError::InvalidCidr(s.to_string()))?
            }
            None => {
                if s.contains(':') {
                    return Err(RangeError::NotIpv4(s.to_string()));
                }
                let addr: Ipv4Addr = s
                    .parse()
                    .map_err(|_| RangeError::InvalidCidr(s.to_string()))?;
                Ipv4Network::new(addr, 32).map_err(|_| RangeError::InvalidCidr(s.to_string()))?
            }
        };

        Self::new(net)
    }
}

impl fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.net.network(), self.net.prefix())
    }
}

impl Serialize for NetworkRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
