//! Application settings and paths.
//!
//! Settings live in a JSON file under the XDG config directory and supply
//! defaults that command-line flags override.

use super::ScanConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::types::PortSpec;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/sweepd)
    pub config_dir: PathBuf,
}

impl Paths {
    pub fn new() -> ConfigResult<Self> {
        let project =
            ProjectDirs::from("com", "sweepd", "sweepd").ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Ports scanned when none are given on the command line.
    pub default_ports: String,
    /// Port probe timeout in milliseconds.
    pub probe_timeout_ms: u64,
    /// Classifier connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Classifier read timeout in milliseconds.
    pub read_timeout_ms: u64,
    /// Maximum simultaneous sockets.
    pub max_workers: usize,
    /// Hosts scanned at the same time.
    pub host_concurrency: usize,
    /// Dial attempts per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Enable verbose output by default.
    pub verbose: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        let scan = ScanConfig::default();
        Self {
            default_ports: PortSpec::default_services().to_string(),
            probe_timeout_ms: scan.probe_timeout.as_millis() as u64,
            connect_timeout_ms: scan.connect_timeout.as_millis() as u64,
            read_timeout_ms: scan.read_timeout.as_millis() as u64,
            max_workers: scan.max_workers,
            host_concurrency: scan.host_concurrency,
            rate_limit: scan.rate_limit,
            verbose: scan.verbose,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    /// Save settings to the default location.
    pub fn save(&self) -> ConfigResult<()> {
        let paths = Paths::new()?;
        fs::create_dir_all(&paths.config_dir)?;
        self.save_to(&paths.settings_file())
    }

    /// Save settings to a specific file.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Build the scan configuration these settings describe.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new()
            .with_probe_timeout(Duration::from_millis(self.probe_timeout_ms))
            .with_connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .with_read_timeout(Duration::from_millis(self.read_timeout_ms))
            .with_max_workers(self.max_workers)
            .with_host_concurrency(self.host_concurrency)
            .with_rate_limit(self.rate_limit)
            .with_verbose(self.verbose)
    }
}
