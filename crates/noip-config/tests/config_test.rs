#![allow(clippy::unwrap_used)]
// Loading and translation tests against config files in a temp dir.
//
// These assume no NOIP_* variables are set in the test environment.

use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;
use tempfile::TempDir;

use noip_config::{
    Config, ConfigError, FileHostnameSource, load_config_from, save_config_to, to_monitor_config,
};
use noip_core::{CoreError, HostnameSource};

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(cfg.username, None);
    assert!(cfg.hostnames.is_empty());
    assert_eq!(cfg.entry_id, "default");
    assert_eq!(cfg.defaults.output, "table");
    assert_eq!(cfg.defaults.timeout, 30);
    assert_eq!(cfg.defaults.interval, 300);
}

#[test]
fn test_hostnames_from_comma_separated_string() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
username = "alice"
hostnames = " example.ddns.net, ,myhost.hopto.org "
"#,
    );

    let cfg = load_config_from(&path).unwrap();
    assert_eq!(
        cfg.hostnames.as_slice(),
        ["example.ddns.net", "myhost.hopto.org"]
    );
}

#[test]
fn test_hostnames_from_array() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
hostnames = ["a.ddns.net", "", "b.ddns.net", "a.ddns.net"]

[defaults]
interval = 60
"#,
    );

    let cfg = load_config_from(&path).unwrap();
    assert_eq!(cfg.hostnames.as_slice(), ["a.ddns.net", "b.ddns.net"]);
    assert_eq!(cfg.defaults.interval, 60);
    assert_eq!(cfg.defaults.timeout, 30);
}

#[test]
fn test_save_then_load_keeps_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.username = Some("alice".into());
    cfg.hostnames = "a.ddns.net,b.ddns.net".parse().unwrap();
    cfg.defaults.output = "json".into();
    save_config_to(&cfg, &path).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.username.as_deref(), Some("alice"));
    assert_eq!(loaded.hostnames, cfg.hostnames);
    assert_eq!(loaded.defaults.output, "json");
}

#[test]
fn test_monitor_config_from_plaintext_credentials() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
username = "noip-test-user-without-keyring"
password = "s3cret"
entry_id = "home"
endpoint = "http://127.0.0.1:8080/nic/update"

[defaults]
timeout = 5
interval = 120
"#,
    );

    let cfg = load_config_from(&path).unwrap();
    let monitor = to_monitor_config(&cfg).unwrap();

    assert_eq!(monitor.credentials.username, "noip-test-user-without-keyring");
    assert_eq!(monitor.credentials.password.expose_secret(), "s3cret");
    assert_eq!(monitor.entry_id, "home");
    assert_eq!(monitor.base_url, "http://127.0.0.1:8080/nic/update");
    assert_eq!(monitor.timeout, Duration::from_secs(5));
    assert_eq!(monitor.refresh_interval, Duration::from_secs(120));
}

#[test]
fn test_missing_username_is_reported() {
    let cfg = Config::default();
    let err = to_monitor_config(&cfg).unwrap_err();
    assert!(matches!(err, ConfigError::NoCredentials { ref what } if what == "username"));
}

#[test]
fn test_invalid_endpoint_is_rejected() {
    let mut cfg = Config::default();
    cfg.username = Some("alice".into());
    cfg.password = Some("pw".into());
    cfg.endpoint = Some("not a url".into());

    let err = to_monitor_config(&cfg).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "endpoint"));
}

#[test]
fn test_redacted_masks_password() {
    let mut cfg = Config::default();
    cfg.password = Some("s3cret".into());

    let shown = toml::to_string(&cfg.redacted()).unwrap();
    assert!(!shown.contains("s3cret"));
    assert!(shown.contains("********"));
}

#[test]
fn test_file_source_rereads_each_cycle() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"hostnames = "a.ddns.net""#);
    let source = FileHostnameSource::new(&path);

    assert_eq!(source.hostnames().unwrap().as_slice(), ["a.ddns.net"]);

    std::fs::write(&path, r#"hostnames = ["b.ddns.net", "c.ddns.net"]"#).unwrap();
    assert_eq!(
        source.hostnames().unwrap().as_slice(),
        ["b.ddns.net", "c.ddns.net"]
    );
}

#[test]
fn test_file_source_surfaces_parse_errors() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "hostnames = [unterminated");
    let source = FileHostnameSource::new(&path);

    assert!(matches!(source.hostnames(), Err(CoreError::Config { .. })));
}
