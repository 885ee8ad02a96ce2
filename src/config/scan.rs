//! Per-scan configuration.
//!
//! Every scanning component receives its knobs from a `ScanConfig` passed in
//! at construction time; nothing reads global state.

use crate::error::ScanError;
use std::time::Duration;

/// Timeout for the open/closed connect probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);
/// Timeout for the classifier's own connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
/// Timeout for each classifier read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);
/// Upper bound on simultaneous dials across the whole scan.
pub const DEFAULT_MAX_WORKERS: usize = 100;
/// Upper bound on a single credential-probe hand-off.
pub const DEFAULT_CREDENTIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Connect timeout used by the port probe.
    pub probe_timeout: Duration,
    /// Connect timeout used by the service classifier.
    pub connect_timeout: Duration,
    /// Read timeout for the banner read and again for the probe response.
    pub read_timeout: Duration,
    /// Maximum number of sockets in flight at once.
    pub max_workers: usize,
    /// Number of hosts processed at the same time. 1 scans hosts sequentially.
    pub host_concurrency: usize,
    /// Dial attempts per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Report every host and port outcome at `info` level.
    pub verbose: bool,
    /// Draw a progress line while scanning (non-verbose mode only).
    pub progress: bool,
    /// Hand recognized services to the registered credential probes.
    pub check_credentials: bool,
    /// Upper bound on each credential-probe call.
    pub credential_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            max_workers: DEFAULT_MAX_WORKERS,
            host_concurrency: 1,
            rate_limit: 0,
            verbose: false,
            progress: true,
            check_credentials: false,
            credential_timeout: DEFAULT_CREDENTIAL_TIMEOUT,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_host_concurrency(mut self, hosts: usize) -> Self {
        self.host_concurrency = hosts;
        self
    }

    pub fn with_rate_limit(mut self, rate: u32) -> Self {
        self.rate_limit = rate;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_credential_checks(mut self, timeout: Duration) -> Self {
        self.check_credentials = true;
        self.credential_timeout = timeout;
        self
    }

    /// Worst-case wall-clock time of one classification.
    pub fn classification_budget(&self) -> Duration {
        self.connect_timeout + self.read_timeout * 2
    }

    /// Reject settings that would stall or never start a scan.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.max_workers == 0 {
            return Err(ScanError::InvalidConfig("max_workers must be at least 1".into()));
        }
        if self.host_concurrency == 0 {
            return Err(ScanError::InvalidConfig("host_concurrency must be at least 1".into()));
        }
        let timeouts = [
            ("probe_timeout", self.probe_timeout),
            ("connect_timeout", self.connect_timeout),
            ("read_timeout", self.read_timeout),
            ("credential_timeout", self.credential_timeout),
        ];
        for (name, value) in timeouts {
            if value.is_zero() {
                return Err(ScanError::InvalidConfig(format!("{name} must be non-zero")));
            }
        }
        Ok(())
    }
}
