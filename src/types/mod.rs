//! Core type definitions using newtype patterns for type safety.
//!
//! These types prevent common logic errors by making invalid states unrepresentable
//! at compile time.

mod network;
mod port;
mod scan_id;

pub use network::{NetworkRange, RangeError};
pub use port::{Port, PortError, PortRange, PortSpec};
pub use scan_id::ScanId;
