// No-IP update client
//
// Wraps a lazily-built `reqwest::Client` with Basic auth, query construction
// and response classification. Every per-host failure is turned into a
// `HostStatus` value here; callers never see transport errors for a lookup.

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use tokio::sync::Mutex;
use tracing::{debug, error, trace};

use crate::auth::Credentials;
use crate::error::Error;
use crate::status::{HostMap, HostStatus, classify};
use crate::transport::TransportConfig;

/// Hostname used when probing credentials. It does not need to exist:
/// `nohost` still proves the account authenticated.
pub const VALIDATION_HOSTNAME: &str = "test";

/// Client for the No-IP `/nic/update` endpoint.
///
/// The HTTP session is created on first use and reused for every request
/// (connections are pooled, so concurrent lookups share it). [`shutdown`]
/// drops the session; a later request builds a fresh one.
///
/// [`shutdown`]: NoIpClient::shutdown
pub struct NoIpClient {
    credentials: Credentials,
    transport: TransportConfig,
    session: Mutex<Option<reqwest::Client>>,
}

impl NoIpClient {
    /// Create a client. No connection is made until the first request.
    pub fn new(credentials: Credentials, transport: TransportConfig) -> Self {
        Self {
            credentials,
            transport,
            session: Mutex::new(None),
        }
    }

    /// The transport settings in use.
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Whether a session is currently open.
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }

    // ── Session management ───────────────────────────────────────────

    async fn session(&self) -> Result<reqwest::Client, Error> {
        let mut guard = self.session.lock().await;
        if let Some(ref http) = *guard {
            return Ok(http.clone());
        }
        trace!("opening HTTP session");
        let http = self.transport.build_client()?;
        *guard = Some(http.clone());
        Ok(http)
    }

    /// Release the HTTP session. Safe to call repeatedly, or before any
    /// request was made.
    pub async fn shutdown(&self) {
        if self.session.lock().await.take().is_some() {
            debug!("HTTP session closed");
        }
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Issue one update request with an empty `myip`, returning the status
    /// code and body.
    async fn send_update(&self, hostname: &str) -> Result<(StatusCode, String), Error> {
        let http = self.session().await?;
        let url = self.transport.update_url()?;
        let timeout_secs = self.transport.timeout.as_secs();

        debug!(hostname, "GET {}", url);

        let resp = http
            .get(url)
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            )
            .query(&[("hostname", hostname), ("myip", "")])
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, timeout_secs))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::from_reqwest(e, timeout_secs))?;
        Ok((status, body))
    }

    /// Fetch the current status of one hostname.
    ///
    /// Never fails: timeouts, transport faults and provider errors all come
    /// back as a disconnected [`HostStatus`] with `error` set.
    pub async fn host_status(&self, hostname: &str) -> HostStatus {
        match self.send_update(hostname).await {
            Ok((status, body)) => {
                debug!(hostname, status = status.as_u16(), body = %body.trim(), "update response");
                classify(hostname, status.as_u16(), &body)
            }
            Err(e) => {
                error!(hostname, error = %e, "update request failed");
                HostStatus::disconnected(hostname, e.host_error())
            }
        }
    }

    /// List every host registered under the account.
    ///
    /// The update protocol has no listing call, so this is always empty.
    /// Hostnames have to come from configuration.
    #[allow(clippy::unused_async)]
    pub async fn list_hosts(&self) -> Result<HostMap, Error> {
        Ok(HostMap::new())
    }

    /// Check whether the credentials are accepted.
    ///
    /// Only a `badauth` answer means the credentials are wrong; anything else
    /// (including `nohost` for the validation hostname) means they were accepted.
    /// Transport failures are logged and reported as invalid.
    pub async fn validate_credentials(&self) -> bool {
        match self.send_update(VALIDATION_HOSTNAME).await {
            Ok((_, body)) => {
                let valid = !body.contains("badauth");
                debug!(username = %self.credentials.username, valid, "credential check");
                valid
            }
            Err(e) => {
                error!(error = %e, "error validating No-IP credentials");
                false
            }
        }
    }
}

impl std::fmt::Debug for NoIpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoIpClient")
            .field("username", &self.credentials.username)
            .field("base_url", &self.transport.base_url)
            .finish_non_exhaustive()
    }
}
