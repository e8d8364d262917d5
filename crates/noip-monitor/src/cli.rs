//! Clap derive structures for the `noip-monitor` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// noip-monitor -- watch No-IP dynamic DNS hostnames
#[derive(Debug, Parser)]
#[command(
    name = "noip-monitor",
    version,
    about = "Monitor No-IP dynamic DNS hostnames from the command line",
    long_about = "Polls the No-IP update endpoint for each configured hostname and\n\
        reports the address it currently resolves to, or why it is disconnected.\n\n\
        Accounts with two-factor authentication must use a DDNS key as the password.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file to use instead of the platform default
    #[arg(long, env = "NOIP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// No-IP account username or email (overrides config)
    #[arg(long, short = 'u', env = "NOIP_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "NOIP_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "NOIP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one host per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one refresh cycle and print every host's status
    #[command(alias = "c")]
    Check(CheckArgs),

    /// Poll continuously, printing sensor states after each cycle
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Check that the configured credentials are accepted
    Validate,

    /// Manage configuration and stored credentials
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Monitor commands ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Comma-separated hostnames (overrides config)
    pub hostnames: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Time between refresh cycles, e.g. "5m" or "90s" [default: from config, else 5m]
    #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Comma-separated hostnames. When omitted, the config file is re-read
    /// every cycle so edits apply without a restart.
    pub hostnames: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Store the account password in the system keyring
    SetPassword,

    /// Replace the monitored hostnames
    SetHostnames {
        /// Comma-separated hostnames, e.g. "home.ddns.net, office.hopto.org"
        hostnames: String,
    },

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
