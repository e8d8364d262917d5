//! Configuration for the No-IP monitor.
//!
//! One TOML file per user, overlaid with `NOIP_*` environment variables,
//! credential resolution (env + keyring + plaintext), and translation to
//! `noip_core::MonitorConfig`. The hostname list is also exposed as a
//! [`HostnameSource`] that re-reads the file every refresh cycle.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use noip_core::{CoreError, Credentials, HostnameSet, HostnameSource, MonitorConfig};

/// Keyring service name under which passwords are stored.
pub const KEYRING_SERVICE: &str = "noip-monitor";

/// Environment variable consulted first for the account password.
pub const PASSWORD_ENV: &str = "NOIP_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {what} configured")]
    NoCredentials { what: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        CoreError::Config {
            message: err.to_string(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// No-IP account username or email.
    pub username: Option<String>,

    /// Password or DDNS key (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    #[serde(default, deserialize_with = "deserialize_opt_text")]
    pub password_env: Option<String>,

    /// Hostnames to monitor. Accepts a comma-separated string or an array.
    #[serde(default, deserialize_with = "deserialize_hostnames")]
    pub hostnames: HostnameSet,

    /// Identifier for this monitor, prefixed onto sensor ids.
    #[serde(default = "default_entry_id", deserialize_with = "deserialize_text")]
    pub entry_id: String,

    /// Update endpoint override.
    pub endpoint: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            password_env: None,
            hostnames: HostnameSet::default(),
            entry_id: default_entry_id(),
            endpoint: None,
            defaults: Defaults::default(),
        }
    }
}

impl Config {
    /// A copy safe to print: the plaintext password is masked.
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "********".into()),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between refresh cycles.
    #[serde(default = "default_interval")]
    pub interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            interval: default_interval(),
        }
    }
}

fn default_entry_id() -> String {
    "default".into()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_interval() -> u64 {
    300
}

fn deserialize_hostnames<'de, D>(deserializer: D) -> Result<HostnameSet, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Joined(joined) => HostnameSet::parse(&joined),
        Raw::List(list) => HostnameSet::new(list),
    })
}

/// Environment values that look like numbers or booleans reach serde typed
/// (`NOIP_ENTRY_ID=42` is an integer); read them back as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    Str(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

impl From<Text> for String {
    fn from(text: Text) -> Self {
        match text {
            Text::Str(s) => s,
            Text::Unsigned(n) => n.to_string(),
            Text::Signed(n) => n.to_string(),
            Text::Float(n) => n.to_string(),
            Text::Bool(b) => b.to_string(),
        }
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Text::deserialize(deserializer).map(String::from)
}

fn deserialize_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Text>::deserialize(deserializer)?.map(String::from))
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "noip-monitor", "noip-monitor").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("noip-monitor");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Nested keys use a double underscore (`NOIP_DEFAULTS__TIMEOUT=10`).
/// `NOIP_PASSWORD` is left to [`resolve_password`], and `NOIP_USERNAME`
/// to the CLI's `--username` flag.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = file_figment(path).merge(
        Env::prefixed("NOIP_")
            .ignore(&["password", "config", "username"])
            .split("__"),
    );

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load what `path` itself contains, without any environment overlay.
///
/// Use this before editing and saving the file, so overrides from the
/// environment are not written back into it.
pub fn load_file_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = file_figment(path).extract()?;
    Ok(config)
}

fn file_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to pretty TOML at `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

pub fn resolve_username(cfg: &Config) -> Result<String, ConfigError> {
    cfg.username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| ConfigError::NoCredentials {
            what: "username".into(),
        })
}

fn keyring_entry(username: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{username}/password"))
}

/// Resolve the password: `NOIP_PASSWORD`, then the variable named by
/// `password_env`, then the system keyring, then plaintext config.
pub fn resolve_password(cfg: &Config, username: &str) -> Result<SecretString, ConfigError> {
    // 1. Fixed env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Config's password_env → env var lookup
    if let Some(ref env_name) = cfg.password_env {
        if let Ok(pw) = std::env::var(env_name) {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(username) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = cfg.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        what: format!("password for '{username}'"),
    })
}

pub fn resolve_credentials(cfg: &Config) -> Result<Credentials, ConfigError> {
    let username = resolve_username(cfg)?;
    let password = resolve_password(cfg, &username)?;
    Ok(Credentials { username, password })
}

/// Store a password in the system keyring for `username`.
pub fn store_password(username: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(username)?.set_password(password)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `MonitorConfig` from the loaded configuration.
pub fn to_monitor_config(cfg: &Config) -> Result<MonitorConfig, ConfigError> {
    if cfg.defaults.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least one second".into(),
        });
    }

    let credentials = resolve_credentials(cfg)?;
    let mut monitor = MonitorConfig::new(credentials);
    monitor.entry_id.clone_from(&cfg.entry_id);
    monitor.timeout = Duration::from_secs(cfg.defaults.timeout);
    monitor.refresh_interval = Duration::from_secs(cfg.defaults.interval);

    if let Some(ref endpoint) = cfg.endpoint {
        let url: url::Url = endpoint.parse().map_err(|_| ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("invalid URL: {endpoint}"),
        })?;
        monitor.base_url = url.to_string();
    }

    Ok(monitor)
}

// ── Hostname source ─────────────────────────────────────────────────

/// Reads `hostnames` from a config file each time it's asked, so edits
/// apply on the next refresh cycle without a restart.
#[derive(Debug, Clone)]
pub struct FileHostnameSource {
    path: PathBuf,
}

impl FileHostnameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HostnameSource for FileHostnameSource {
    fn hostnames(&self) -> Result<HostnameSet, CoreError> {
        let cfg = load_config_from(&self.path)?;
        Ok(cfg.hostnames)
    }
}
