// ── Update response classification ──
//
// The update endpoint answers with a bare text token, optionally followed by
// the address it holds for the host ("good 1.2.3.4", "nochg 1.2.3.4",
// "nohost", "badauth", ...). These map onto a two-state connectivity model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Per-host results keyed by hostname, in the order they were requested.
pub type HostMap = IndexMap<String, HostStatus>;

/// Connectivity of a hostname as seen by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// Status of one hostname from a single update request.
///
/// Built through [`HostStatus::connected`] or [`HostStatus::disconnected`]:
/// a connected host always carries an address, a disconnected one never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStatus {
    pub hostname: String,
    pub ip: Option<String>,
    pub status: ConnectionStatus,
    /// Raw provider token (`good` / `nochg`) for connected hosts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HostStatus {
    pub fn connected(
        hostname: impl Into<String>,
        ip: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            ip: Some(ip.into()),
            status: ConnectionStatus::Connected,
            response: Some(response.into()),
            error: None,
        }
    }

    pub fn disconnected(hostname: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ip: None,
            status: ConnectionStatus::Disconnected,
            response: None,
            error: Some(error.into()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

/// Classify an update response for `hostname`.
///
/// Non-200 answers are reported by status code alone. For 200 answers the
/// rules are checked in order: `good`/`nochg` with an address, then the
/// `nohost`, `abuse` and `badauth` substrings, and finally an unknown
/// response carrying the body verbatim.
pub fn classify(hostname: &str, status: u16, body: &str) -> HostStatus {
    if status != 200 {
        return HostStatus::disconnected(hostname, format!("HTTP {status}"));
    }

    let mut tokens = body.split_whitespace();
    if let (Some(token @ ("good" | "nochg")), Some(ip)) = (tokens.next(), tokens.next()) {
        return HostStatus::connected(hostname, ip, token);
    }

    let error = if body.contains("nohost") {
        "Host not found".to_owned()
    } else if body.contains("abuse") {
        "Account blocked for abuse".to_owned()
    } else if body.contains("badauth") {
        "Invalid credentials".to_owned()
    } else {
        format!("Unknown response: {body}")
    };
    HostStatus::disconnected(hostname, error)
}
