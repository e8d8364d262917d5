// ── Runtime monitor configuration ──
//
// These types describe *how* to talk to No-IP and how often to poll.
// They carry credential data and timing, but never touch disk.
// The CLI constructs a `MonitorConfig` and hands it in.

use std::time::Duration;

use noip_api::transport::{DEFAULT_TIMEOUT, UPDATE_URL};
use noip_api::{Credentials, TransportConfig};

/// Default period between refresh cycle starts.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for monitoring one No-IP account.
///
/// Hostnames are deliberately absent: they are read fresh every cycle from
/// a [`HostnameSource`](crate::HostnameSource).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub credentials: Credentials,
    /// Identifier of this monitor instance, used to derive sensor ids.
    pub entry_id: String,
    /// Update endpoint URL.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Period between cycle starts. Zero disables the background task.
    pub refresh_interval: Duration,
}

impl MonitorConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            entry_id: "default".into(),
            base_url: UPDATE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Transport settings for the API client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(self.timeout)
    }
}
