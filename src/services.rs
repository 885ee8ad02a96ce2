//! Hand-off to per-service credential probes.
//!
//! Once a port is classified as a known service, the scanner can ask a
//! registered [`CredentialProbe`] whether the service still accepts default
//! credentials. The probes themselves live outside this crate; the scanner
//! only records whether they report success.

use crate::classifier::ServiceKind;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// A service-specific default-credential check.
#[async_trait]
pub trait CredentialProbe: Send + Sync {
    /// Returns `true` if the service on `host:port` accepted a default login.
    async fn attempt_default_credentials(&self, host: Ipv4Addr, port: u16) -> bool;
}

/// Credential probes keyed by the service they understand.
#[derive(Clone, Default)]
pub struct ServiceProbes {
    probes: HashMap<ServiceKind, Arc<dyn CredentialProbe>>,
}

impl ServiceProbes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `probe` for `kind`, replacing any earlier registration.
    pub fn register(mut self, kind: ServiceKind, probe: Arc<dyn CredentialProbe>) -> Self {
        self.probes.insert(kind, probe);
        self
    }

    pub fn get(&self, kind: ServiceKind) -> Option<&Arc<dyn CredentialProbe>> {
        self.probes.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

impl fmt::Debug for ServiceProbes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.probes.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysAccepts;

    #[async_trait]
    impl CredentialProbe for AlwaysAccepts {
        async fn attempt_default_credentials(&self, _host: Ipv4Addr, _port: u16) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_lookup_by_kind() {
        let probes = ServiceProbes::new().register(ServiceKind::Ssh, Arc::new(AlwaysAccepts));
        assert!(!probes.is_empty());
        assert!(probes.get(ServiceKind::Ftp).is_none());

        let probe = probes.get(ServiceKind::Ssh).unwrap();
        assert!(probe.attempt_default_credentials(Ipv4Addr::LOCALHOST, 22).await);
    }
}
