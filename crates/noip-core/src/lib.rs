// noip-core: Polling coordinator between noip-api and consumers (CLI, sensors).

pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod provider;
pub mod sensor;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::MonitorConfig;
pub use coordinator::{Coordinator, CoordinatorState};
pub use error::CoreError;
pub use model::{HostnameSet, Snapshot};
pub use provider::{HostnameSource, StatusProvider};
pub use sensor::{DeviceInfo, HostSensor, SensorAttributes, SensorPlatform, SensorState};
pub use stream::SnapshotStream;

// Re-export API types consumers need without depending on noip-api directly.
pub use noip_api::{ConnectionStatus, Credentials, HostStatus, NoIpClient, TransportConfig};
