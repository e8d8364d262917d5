// ── Core error types ──
//
// Cycle-level errors from noip-core. Per-host failures never show up here;
// they are data on `HostStatus`. The `From<noip_api::Error>` impl translates
// transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Refresh errors ───────────────────────────────────────────────
    /// A whole refresh cycle failed; the previous snapshot is still current.
    #[error("Error communicating with No-IP: {message}")]
    RefreshFailed { message: String },

    #[error("Cannot reach No-IP at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("No-IP request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The coordinator was shut down; no further cycles run.
    #[error("Coordinator stopped")]
    Stopped,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Wrap any cycle fault as a refresh failure carrying its description.
    pub(crate) fn refresh_failed(err: &CoreError) -> Self {
        match err {
            Self::RefreshFailed { message } => Self::RefreshFailed {
                message: message.clone(),
            },
            other => Self::RefreshFailed {
                message: other.to_string(),
            },
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<noip_api::Error> for CoreError {
    fn from(err: noip_api::Error) -> Self {
        match err {
            // Timeouts were already promoted by `noip_api::Error::from_reqwest`.
            noip_api::Error::Transport(e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            noip_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            noip_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
        }
    }
}
