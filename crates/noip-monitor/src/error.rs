//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use noip_config::ConfigError;
use noip_core::CoreError;

pub mod exit_code {
    #[allow(dead_code)]
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach No-IP at {url}")]
    #[diagnostic(
        code(noip::connection_failed),
        help(
            "Check your network connection.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Error communicating with No-IP: {message}")]
    #[diagnostic(
        code(noip::refresh_failed),
        help("The previous results are unchanged. Run with -v for details.")
    )]
    RefreshFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("No-IP rejected the credentials for '{username}'")]
    #[diagnostic(
        code(noip::auth_failed),
        help(
            "Verify your username and password.\n\
             Accounts with two-factor authentication need a DDNS key instead.\n\
             Run: noip-monitor config set-password"
        )
    )]
    AuthFailed { username: String },

    #[error("No {what} configured")]
    #[diagnostic(
        code(noip::no_credentials),
        help(
            "Configure credentials with: noip-monitor config init\n\
             Or set NOIP_USERNAME and NOIP_PASSWORD.\n\
             Config file: {path}"
        )
    )]
    NoCredentials { what: String, path: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(noip::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(noip::config),
        help("Check the config file, or recreate it with: noip-monitor config init")
    )]
    Config { message: String },

    #[error("Keyring error: {message}")]
    #[diagnostic(
        code(noip::keyring),
        help("Store the password in the config file or NOIP_PASSWORD instead.")
    )]
    Keyring { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(noip::timeout),
        help("Increase timeout with --timeout or try again later.")
    )]
    Timeout { seconds: u64 },

    #[error("Monitor stopped")]
    #[diagnostic(code(noip::stopped))]
    Stopped,

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(noip::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(noip::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RefreshFailed { message } => CliError::RefreshFailed { message },
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Stopped => CliError::Stopped,
            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { what } => CliError::NoCredentials {
                what,
                path: noip_config::config_path().display().to_string(),
            },
            ConfigError::Keyring(e) => CliError::Keyring {
                message: e.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => {
                CliError::Config {
                    message: other.to_string(),
                }
            }
        }
    }
}
