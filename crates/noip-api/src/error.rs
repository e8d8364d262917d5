use thiserror::Error;

/// Top-level error type for the `noip-api` crate.
///
/// Per-hostname lookups never surface these to callers -- they are folded
/// into [`HostStatus::error`](crate::HostStatus) instead. The variants still
/// matter for session construction and for `noip-core`, which maps them into
/// cycle-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl Error {
    /// Wrap a `reqwest` failure, promoting timeouts to [`Error::Timeout`].
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::Transport(err)
        }
    }

    /// The short description stored on a disconnected host.
    ///
    /// Timeouts collapse to the literal `"Timeout"`; transport failures keep
    /// the underlying `reqwest` message without the variant prefix.
    pub fn host_error(&self) -> String {
        match self {
            Self::Timeout { .. } => "Timeout".into(),
            Self::Transport(e) => e.to_string(),
            Self::InvalidUrl(e) => e.to_string(),
        }
    }
}
