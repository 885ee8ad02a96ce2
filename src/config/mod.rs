//! Configuration management for sweepd.
//!
//! `ScanConfig` carries the knobs of a single run; `AppSettings` persists
//! user defaults in an XDG-compliant settings file.

mod scan;
mod settings;

pub use scan::{
    ScanConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_CREDENTIAL_TIMEOUT, DEFAULT_MAX_WORKERS,
    DEFAULT_PROBE_TIMEOUT, DEFAULT_READ_TIMEOUT,
};
pub use settings::{AppSettings, Paths};
