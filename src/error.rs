//! Error types for sweepd.
//!
//! Uses `thiserror` for ergonomic error definitions. Only the configuration
//! layer produces errors: once a scan starts, transport failures are reported
//! as values on the result (see [`crate::classifier::ServiceIdentity`]).

use crate::types::{PortError, RangeError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while preparing a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid network range: {0}")]
    InvalidRange(#[from] RangeError),

    #[error("invalid port list: {0}")]
    InvalidPorts(#[from] PortError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from loading or saving settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Top-level error for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl From<RangeError> for CliError {
    fn from(e: RangeError) -> Self {
        Self::Scan(ScanError::InvalidRange(e))
    }
}

impl From<PortError> for CliError {
    fn from(e: PortError) -> Self {
        Self::Scan(ScanError::InvalidPorts(e))
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
