// Shared transport configuration for building the reqwest::Client session.
//
// The update endpoint, timeout, and user agent live here so tests can point
// the client at a local mock server without touching request logic.

use std::time::Duration;

use url::Url;

/// The No-IP dynamic update endpoint.
pub const UPDATE_URL: &str = "https://dynupdate.no-ip.com/nic/update";

/// Sent on every request; No-IP asks clients to identify themselves.
pub const USER_AGENT: &str = "noip-monitor/1.0";

/// Upper bound on a single update request, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Full URL of the update endpoint (`.../nic/update`).
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: UPDATE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    /// Point the transport at a different endpoint (mock servers, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse the configured endpoint.
    pub fn update_url(&self) -> Result<Url, crate::error::Error> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()?;
        Ok(client)
    }
}
