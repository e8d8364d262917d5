// ── Sensor projection ──
//
// Turns coordinator snapshots into one sensor per hostname: a primary value
// (the address, or "Disconnected"), an icon, attributes, and availability.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::coordinator::Coordinator;
use crate::model::Snapshot;
use crate::provider::StatusProvider;

/// Primary value of a sensor whose host is not connected or not known.
pub const STATE_DISCONNECTED: &str = "Disconnected";
pub const ICON_CONNECTED: &str = "mdi:lan-connect";
pub const ICON_DISCONNECTED: &str = "mdi:lan-disconnect";

/// Groups every sensor of one monitor under a single service device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

impl DeviceInfo {
    pub fn new(entry_id: &str, username: &str) -> Self {
        Self {
            identifier: entry_id.to_owned(),
            name: format!("NoIP Monitor ({username})"),
            manufacturer: "NoIP".into(),
            model: "Dynamic DNS Monitor".into(),
        }
    }
}

/// Extra attributes exposed alongside the primary value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorAttributes {
    pub hostname: String,
    /// `connected`, `disconnected`, or `unknown` when the host is missing
    /// from the snapshot.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a sensor renders at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub name: String,
    pub value: String,
    pub icon: &'static str,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<SensorAttributes>,
}

/// Sensor for a single hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSensor {
    hostname: String,
    unique_id: String,
}

impl HostSensor {
    pub fn new(entry_id: &str, hostname: &str) -> Self {
        Self {
            hostname: hostname.to_owned(),
            unique_id: format!("{entry_id}_{hostname}"),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// The host's address when connected, otherwise [`STATE_DISCONNECTED`].
    pub fn native_value(&self, snapshot: &Snapshot) -> String {
        match snapshot.get(&self.hostname) {
            Some(status) if status.is_connected() => status
                .ip
                .clone()
                .unwrap_or_else(|| STATE_DISCONNECTED.to_owned()),
            _ => STATE_DISCONNECTED.to_owned(),
        }
    }

    /// `None` while the snapshot is empty.
    pub fn attributes(&self, snapshot: &Snapshot) -> Option<SensorAttributes> {
        if snapshot.is_empty() {
            return None;
        }
        let status = snapshot.get(&self.hostname);
        Some(SensorAttributes {
            hostname: self.hostname.clone(),
            status: status.map_or_else(|| "unknown".into(), |s| s.status.to_string()),
            response: status.and_then(|s| s.response.clone()),
            error: status.and_then(|s| s.error.clone()),
        })
    }

    pub fn icon(&self, snapshot: &Snapshot) -> &'static str {
        if self.native_value(snapshot) == STATE_DISCONNECTED {
            ICON_DISCONNECTED
        } else {
            ICON_CONNECTED
        }
    }

    /// Render against a snapshot. `available` is the coordinator's
    /// last-cycle success flag.
    pub fn render(&self, snapshot: &Snapshot, available: bool) -> SensorState {
        SensorState {
            unique_id: self.unique_id.clone(),
            name: self.hostname.clone(),
            value: self.native_value(snapshot),
            icon: self.icon(snapshot),
            available,
            attributes: self.attributes(snapshot),
        }
    }
}

// ── SensorPlatform ───────────────────────────────────────────────

/// Materializes a [`HostSensor`] for every hostname that shows up in a
/// snapshot.
///
/// Holds its own set of already-materialized hostnames; call
/// [`sync()`](Self::sync) after each publication to pick up new ones.
/// Sensors are never removed, so a hostname dropped from configuration keeps
/// its sensor (rendering `Disconnected` / `unknown`).
pub struct SensorPlatform<P: StatusProvider> {
    coordinator: Coordinator<P>,
    entry_id: String,
    device: DeviceInfo,
    materialized: HashSet<String>,
    sensors: Vec<HostSensor>,
}

impl<P: StatusProvider> SensorPlatform<P> {
    /// Set up the platform and materialize sensors for the coordinator's
    /// current snapshot.
    pub fn new(coordinator: Coordinator<P>, entry_id: &str, username: &str) -> Self {
        let mut platform = Self {
            coordinator,
            entry_id: entry_id.to_owned(),
            device: DeviceInfo::new(entry_id, username),
            materialized: HashSet::new(),
            sensors: Vec::new(),
        };
        let snapshot = platform.coordinator.snapshot();
        platform.sync(&snapshot);
        platform
    }

    /// Add sensors for hostnames in `snapshot` that have none yet,
    /// returning the newly created ones.
    pub fn sync(&mut self, snapshot: &Snapshot) -> Vec<HostSensor> {
        let added: Vec<HostSensor> = snapshot
            .hostnames()
            .filter(|h| !self.materialized.contains(*h))
            .map(|h| HostSensor::new(&self.entry_id, h))
            .collect();

        for sensor in &added {
            debug!(unique_id = sensor.unique_id(), "adding sensor");
            self.materialized.insert(sensor.hostname.clone());
            self.sensors.push(sensor.clone());
        }
        added
    }

    pub fn sensors(&self) -> &[HostSensor] {
        &self.sensors
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    pub fn coordinator(&self) -> &Coordinator<P> {
        &self.coordinator
    }

    /// Render every sensor against the coordinator's latest snapshot.
    pub fn render_all(&self) -> Vec<SensorState> {
        let snapshot = self.coordinator.snapshot();
        let available = self.coordinator.last_update_success();
        self.sensors
            .iter()
            .map(|s| s.render(&snapshot, available))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use noip_api::HostStatus;

    use super::*;

    fn snapshot(entries: &[HostStatus]) -> Snapshot {
        entries
            .iter()
            .map(|s| (s.hostname.clone(), s.clone()))
            .collect()
    }

    #[test]
    fn connected_host_shows_address() {
        let snap = snapshot(&[HostStatus::connected("a.ddns.net", "1.2.3.4", "good")]);
        let sensor = HostSensor::new("entry", "a.ddns.net");

        assert_eq!(sensor.native_value(&snap), "1.2.3.4");
        assert_eq!(sensor.icon(&snap), ICON_CONNECTED);
        assert_eq!(sensor.unique_id(), "entry_a.ddns.net");
        assert_eq!(
            sensor.attributes(&snap),
            Some(SensorAttributes {
                hostname: "a.ddns.net".into(),
                status: "connected".into(),
                response: Some("good".into()),
                error: None,
            })
        );
    }

    #[test]
    fn disconnected_host_shows_sentinel_and_error() {
        let snap = snapshot(&[HostStatus::disconnected("b.ddns.net", "Host not found")]);
        let sensor = HostSensor::new("entry", "b.ddns.net");

        assert_eq!(sensor.native_value(&snap), STATE_DISCONNECTED);
        assert_eq!(sensor.icon(&snap), ICON_DISCONNECTED);
        let attrs = sensor.attributes(&snap).unwrap_or_else(|| panic!("attributes"));
        assert_eq!(attrs.status, "disconnected");
        assert_eq!(attrs.error.as_deref(), Some("Host not found"));
        assert_eq!(attrs.response, None);
    }

    #[test]
    fn missing_host_is_unknown() {
        let snap = snapshot(&[HostStatus::connected("a.ddns.net", "1.2.3.4", "good")]);
        let sensor = HostSensor::new("entry", "gone.ddns.net");

        assert_eq!(sensor.native_value(&snap), STATE_DISCONNECTED);
        let attrs = sensor.attributes(&snap).unwrap_or_else(|| panic!("attributes"));
        assert_eq!(attrs.status, "unknown");
        assert_eq!(attrs.error, None);
    }

    #[test]
    fn empty_snapshot_has_no_attributes() {
        let sensor = HostSensor::new("entry", "a.ddns.net");
        let snap = Snapshot::new();

        assert_eq!(sensor.attributes(&snap), None);
        assert_eq!(sensor.native_value(&snap), STATE_DISCONNECTED);
    }

    #[test]
    fn render_carries_availability() {
        let snap = snapshot(&[HostStatus::connected("a.ddns.net", "1.2.3.4", "nochg")]);
        let state = HostSensor::new("entry", "a.ddns.net").render(&snap, false);

        assert!(!state.available);
        assert_eq!(state.value, "1.2.3.4");
        assert_eq!(state.name, "a.ddns.net");
    }

    #[test]
    fn device_info_names_account() {
        let device = DeviceInfo::new("entry", "alice");
        assert_eq!(device.name, "NoIP Monitor (alice)");
        assert_eq!(device.manufacturer, "NoIP");
        assert_eq!(device.model, "Dynamic DNS Monitor");
    }
}
