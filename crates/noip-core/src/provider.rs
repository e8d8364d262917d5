// ── Coordinator seams ──
//
// The coordinator talks to the provider and reads its hostname list through
// these traits, so the polling logic can run against stubs in tests.

use std::future::Future;

use noip_api::{Error, HostMap, HostStatus, NoIpClient};
use tokio::sync::watch;

use crate::error::CoreError;
use crate::model::HostnameSet;

/// Source of per-host statuses.
///
/// `host_status` must not fail: any problem reaching the provider is
/// reported on the returned [`HostStatus`].
pub trait StatusProvider: Send + Sync + 'static {
    fn host_status(&self, hostname: &str) -> impl Future<Output = HostStatus> + Send;

    /// Every host registered under the account, when the provider can list them.
    fn list_hosts(&self) -> impl Future<Output = Result<HostMap, Error>> + Send;

    fn validate_credentials(&self) -> impl Future<Output = bool> + Send;

    /// Release network resources. Must be idempotent.
    fn shutdown(&self) -> impl Future<Output = ()> + Send;
}

impl StatusProvider for NoIpClient {
    fn host_status(&self, hostname: &str) -> impl Future<Output = HostStatus> + Send {
        NoIpClient::host_status(self, hostname)
    }

    fn list_hosts(&self) -> impl Future<Output = Result<HostMap, Error>> + Send {
        NoIpClient::list_hosts(self)
    }

    fn validate_credentials(&self) -> impl Future<Output = bool> + Send {
        NoIpClient::validate_credentials(self)
    }

    fn shutdown(&self) -> impl Future<Output = ()> + Send {
        NoIpClient::shutdown(self)
    }
}

/// Where the coordinator reads its hostname list from, once per cycle.
///
/// Reading can fail (a config file gone missing, say); such a failure
/// fails the whole cycle.
pub trait HostnameSource: Send + Sync {
    fn hostnames(&self) -> Result<HostnameSet, CoreError>;
}

/// A fixed list.
impl HostnameSource for HostnameSet {
    fn hostnames(&self) -> Result<HostnameSet, CoreError> {
        Ok(self.clone())
    }
}

/// A list that can be swapped at runtime by whoever holds the sender.
impl HostnameSource for watch::Receiver<HostnameSet> {
    fn hostnames(&self) -> Result<HostnameSet, CoreError> {
        Ok(self.borrow().clone())
    }
}
