//! CLI-aware configuration: global flag overrides on top of `noip-config`,
//! and construction of the coordinator the monitor commands run.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use noip_config::{Config, ConfigError, FileHostnameSource};
use noip_core::{Coordinator, HostnameSet, MonitorConfig};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// The config file in effect: `--config` / `NOIP_CONFIG`, else the
/// platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(noip_config::config_path)
}

/// Load the config file and apply global flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = noip_config::load_config_from(&config_file(global))?;

    if let Some(ref username) = global.username {
        cfg.username = Some(username.clone());
    }
    if let Some(timeout) = global.timeout {
        cfg.defaults.timeout = timeout;
    }

    Ok(cfg)
}

/// Translate config into the monitor's runtime settings.
pub fn monitor_config(global: &GlobalOpts, cfg: &Config) -> Result<MonitorConfig, CliError> {
    noip_config::to_monitor_config(cfg).map_err(|err| match err {
        ConfigError::NoCredentials { what } => CliError::NoCredentials {
            what,
            path: config_file(global).display().to_string(),
        },
        other => other.into(),
    })
}

/// Output format: flag > config default > table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// Color mode: flag > config default > auto.
pub fn color_mode(global: &GlobalOpts, cfg: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}

/// Build a coordinator for `monitor`.
///
/// Hostnames given on the command line are fixed for the coordinator's
/// lifetime; otherwise they are re-read from the config file every cycle.
pub fn coordinator(
    global: &GlobalOpts,
    monitor: &MonitorConfig,
    hostnames: Option<&str>,
    interval: Option<Duration>,
) -> Coordinator {
    let mut monitor = monitor.clone();
    if let Some(interval) = interval {
        monitor.refresh_interval = interval;
    }

    match hostnames {
        Some(list) => Coordinator::from_config(&monitor, HostnameSet::parse(list)),
        None => Coordinator::from_config(&monitor, FileHostnameSource::new(config_file(global))),
    }
}
