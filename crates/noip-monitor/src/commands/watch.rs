//! Continuous monitoring: runs the coordinator and prints sensor states
//! after every cycle until interrupted.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::info;

use noip_core::sensor::STATE_DISCONNECTED;
use noip_core::{
    Coordinator, CoordinatorState, HostSensor, NoIpClient, SensorPlatform, SensorState,
};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

/// What gets printed after each cycle.
#[derive(Serialize)]
struct CycleReport {
    at: DateTime<Utc>,
    last_refresh: Option<DateTime<Utc>>,
    available: bool,
    sensors: Vec<SensorState>,
}

struct Printer {
    format: OutputFormat,
    color: bool,
    quiet: bool,
}

impl Printer {
    fn announce(&self, added: &[HostSensor]) {
        if self.quiet || self.format != OutputFormat::Table {
            return;
        }
        for sensor in added {
            eprintln!("+ sensor {} ({})", sensor.hostname(), sensor.unique_id());
        }
    }

    fn report(&self, report: &CycleReport) -> Result<(), CliError> {
        let out = match self.format {
            OutputFormat::Table | OutputFormat::Plain => self.text(report),
            // One document per cycle, so the stream stays line-oriented.
            OutputFormat::Json | OutputFormat::JsonCompact => serde_json::to_string(report)?,
            OutputFormat::Yaml => format!("---\n{}", serde_yaml::to_string(report)?),
        };
        output::print_output(&out, self.quiet);
        Ok(())
    }

    fn text(&self, report: &CycleReport) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let stamp = report.at.with_timezone(&Local).format("%H:%M:%S").to_string();
        let _ = write!(out, "{}", output::dim(&format!("[{stamp}]"), self.color));
        if !report.available {
            let _ = write!(out, " update failed; showing previous data");
        }
        if report.sensors.is_empty() {
            let _ = write!(out, " no hosts");
        }
        for state in &report.sensors {
            let connected = state.value != STATE_DISCONNECTED;
            let _ = write!(
                out,
                "\n  {:<32} {}",
                state.name,
                output::paint_value(&state.value, connected, self.color)
            );
            if let Some(error) = state.attributes.as_ref().and_then(|a| a.error.as_deref()) {
                let _ = write!(out, " {}", output::dim(&format!("({error})"), self.color));
            }
        }
        out
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let monitor = config::monitor_config(global, &cfg)?;
    let printer = Printer {
        format: config::output_format(global, &cfg),
        color: output::should_color(config::color_mode(global, &cfg)),
        quiet: global.quiet,
    };

    let coordinator =
        config::coordinator(global, &monitor, args.hostnames.as_deref(), args.interval);
    if coordinator.refresh_interval().is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be greater than zero".into(),
        });
    }

    // Setup fails outright if the first cycle does.
    if let Err(e) = coordinator.first_refresh().await {
        coordinator.shutdown().await;
        return Err(e.into());
    }

    let mut platform = SensorPlatform::new(
        coordinator.clone(),
        &monitor.entry_id,
        &monitor.credentials.username,
    );
    printer.announce(platform.sensors());
    printer.report(&cycle_report(&platform))?;

    let result = follow(&coordinator, &mut platform, &printer).await;
    coordinator.shutdown().await;
    result
}

/// Print after every completed cycle until Ctrl-C or shutdown.
async fn follow(
    coordinator: &Coordinator,
    platform: &mut SensorPlatform<NoIpClient>,
    printer: &Printer,
) -> Result<(), CliError> {
    let mut states = coordinator.state_changes();
    states.mark_unchanged();
    coordinator.start().await;
    info!(
        interval = %humantime::format_duration(coordinator.refresh_interval()),
        "watching; press Ctrl-C to stop"
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            changed = states.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = *states.borrow_and_update();
                match state {
                    CoordinatorState::Idle => {
                        let added = platform.sync(&coordinator.snapshot());
                        printer.announce(&added);
                        printer.report(&cycle_report(platform))?;
                    }
                    CoordinatorState::Refreshing => {}
                    CoordinatorState::Stopped => return Ok(()),
                }
            }
        }
    }
}

fn cycle_report(platform: &SensorPlatform<NoIpClient>) -> CycleReport {
    let coordinator = platform.coordinator();
    CycleReport {
        at: Utc::now(),
        last_refresh: coordinator.last_refresh(),
        available: coordinator.last_update_success(),
        sensors: platform.render_all(),
    }
}
