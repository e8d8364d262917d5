//! One-shot status check.

use tabled::Tabled;

use noip_core::HostStatus;
use noip_core::sensor::STATE_DISCONNECTED;

use crate::cli::{CheckArgs, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct HostRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Response")]
    response: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&HostStatus> for HostRow {
    fn from(s: &HostStatus) -> Self {
        Self {
            hostname: s.hostname.clone(),
            status: s.status.to_string(),
            ip: s.ip.clone().unwrap_or_default(),
            response: s.response.clone().unwrap_or_default(),
            error: s.error.clone().unwrap_or_default(),
        }
    }
}

fn plain_line(s: &HostStatus) -> String {
    format!(
        "{}\t{}",
        s.hostname,
        s.ip.as_deref().unwrap_or(STATE_DISCONNECTED)
    )
}

// ── Handler ─────────────────────────────────────────────────────────

/// Disconnected hosts are data, not failures: the command succeeds as long
/// as the cycle itself completes.
pub async fn handle(args: CheckArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let monitor = config::monitor_config(global, &cfg)?;
    let format = config::output_format(global, &cfg);
    let coordinator = config::coordinator(global, &monitor, args.hostnames.as_deref(), None);

    let spinner = util::spinner("Checking hostnames...", global.quiet);
    let result = coordinator.first_refresh().await;
    spinner.finish_and_clear();
    coordinator.shutdown().await;
    let snapshot = result?;

    let hosts: Vec<HostStatus> = snapshot.iter().map(|(_, s)| s.clone()).collect();
    let out = output::render_list(format, &hosts, |s| HostRow::from(s), plain_line)?;
    output::print_output(&out, global.quiet);

    if !global.quiet {
        if hosts.is_empty() {
            eprintln!(
                "No hostnames configured. Add some with: noip-monitor config set-hostnames <HOSTNAMES>"
            );
        } else if format == OutputFormat::Table {
            eprintln!(
                "{} hosts, {} connected",
                snapshot.len(),
                snapshot.connected_count()
            );
        }
    }
    Ok(())
}
