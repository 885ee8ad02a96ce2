//! Command-line interface definitions for sweepd.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags left
//! unset fall back to the settings file.

use crate::config::{AppSettings, ScanConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Sweep an IPv4 range for open TCP ports and identify the services behind them.
#[derive(Parser, Debug)]
#[command(name = "sweepd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent network sweeper with service classification", long_about = None)]
pub struct Args {
    /// Network range to scan in CIDR notation (e.g. 192.168.1.0/24)
    #[arg(value_name = "RANGE")]
    pub range: String,

    /// Ports to scan (e.g. "22", "22,80,443", "1-1024", "21-23,3306")
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Maximum number of sockets in flight at once
    #[arg(short = 'c', long = "max-workers")]
    pub max_workers: Option<usize>,

    /// Port probe timeout in milliseconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Classifier read timeout in milliseconds
    #[arg(long = "read-timeout")]
    pub read_timeout: Option<u64>,

    /// Number of hosts scanned at the same time
    #[arg(long = "host-concurrency")]
    pub host_concurrency: Option<usize>,

    /// Rate limit in connection attempts per second (0 = unlimited)
    #[arg(short = 'r', long = "rate")]
    pub rate_limit: Option<u32>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Write results to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Report every host and port as it is scanned
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not draw the progress line
    #[arg(long)]
    pub no_progress: bool,

    /// Path to a settings file (defaults to the XDG config directory)
    #[arg(long, value_name = "PATH", env = "SWEEPD_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Port list: the flag if given, otherwise the settings default.
    pub fn port_list(&self, settings: &AppSettings) -> String {
        self.ports
            .clone()
            .unwrap_or_else(|| settings.default_ports.clone())
    }

    /// Merge flags over `settings` into the scan configuration.
    pub fn scan_config(&self, settings: &AppSettings) -> ScanConfig {
        let mut config = settings.scan_config();

        if let Some(ms) = self.timeout {
            config = config.with_probe_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.read_timeout {
            config = config.with_read_timeout(Duration::from_millis(ms));
        }
        if let Some(workers) = self.max_workers {
            config = config.with_max_workers(workers);
        }
        if let Some(hosts) = self.host_concurrency {
            config = config.with_host_concurrency(hosts);
        }
        if let Some(rate) = self.rate_limit {
            config = config.with_rate_limit(rate);
        }
        if self.verbose {
            config = config.with_verbose(true);
        }

        config.with_progress(!self.no_progress)
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation_uses_settings() {
        let args = Args::parse_from(["sweepd", "192.168.1.0/24"]);
        let settings = AppSettings {
            max_workers: 42,
            ..AppSettings::default()
        };

        assert_eq!(args.port_list(&settings), settings.default_ports);
        let config = args.scan_config(&settings);
        assert_eq!(config.max_workers, 42);
        assert!(config.progress);
        assert!(!config.verbose);
        assert_eq!(args.output, OutputFormat::Plain);
    }

    #[test]
    fn test_flags_override_settings() {
        let args = Args::parse_from([
            "sweepd",
            "10.0.0.0/30",
            "-p",
            "22,9999",
            "-c",
            "8",
            "-t",
            "250",
            "--host-concurrency",
            "2",
            "-o",
            "json",
            "-v",
            "--no-progress",
        ]);
        let settings = AppSettings::default();
        let config = args.scan_config(&settings);

        assert_eq!(args.port_list(&settings), "22,9999");
        assert_eq!(config.max_workers, 8);
        assert_eq!(config.probe_timeout, Duration::from_millis(250));
        assert_eq!(config.host_concurrency, 2);
        assert!(config.verbose);
        assert!(!config.progress);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Args::try_parse_from(["sweepd", "10.0.0.0/30", "-o", "xml"]).is_err());
    }
}
