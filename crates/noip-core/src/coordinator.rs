// ── Polling coordinator ──
//
// Owns the refresh lifecycle for one No-IP account: the forced first cycle,
// the periodic background task, snapshot publication, and teardown.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use strum::Display;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use noip_api::NoIpClient;

use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::model::Snapshot;
use crate::provider::{HostnameSource, StatusProvider};
use crate::stream::SnapshotStream;

// ── CoordinatorState ─────────────────────────────────────────────

/// Lifecycle state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CoordinatorState {
    Idle,
    Refreshing,
    /// Torn down; no further cycles will run.
    Stopped,
}

// ── Coordinator ──────────────────────────────────────────────────

/// Periodically polls every configured hostname and publishes a
/// [`Snapshot`] of the results.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Construct it once and hand
/// clones to whatever renders the data (see [`SensorPlatform`]).
///
/// [`SensorPlatform`]: crate::SensorPlatform
pub struct Coordinator<P: StatusProvider = NoIpClient> {
    inner: Arc<CoordinatorInner<P>>,
}

impl<P: StatusProvider> Clone for Coordinator<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CoordinatorInner<P> {
    provider: P,
    hostnames: Box<dyn HostnameSource>,
    refresh_interval: Duration,
    snapshot: watch::Sender<Arc<Snapshot>>,
    state: watch::Sender<CoordinatorState>,
    last_update_success: watch::Sender<bool>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
    /// Held for the duration of a cycle so cycles never interleave.
    cycle: Mutex<()>,
    cancel: CancellationToken,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Coordinator<NoIpClient> {
    /// Build a coordinator backed by a real [`NoIpClient`].
    pub fn from_config(config: &MonitorConfig, hostnames: impl HostnameSource + 'static) -> Self {
        let client = NoIpClient::new(config.credentials.clone(), config.transport());
        Self::new(client, hostnames, config.refresh_interval)
    }
}

impl<P: StatusProvider> Coordinator<P> {
    /// Create a coordinator. Does NOT poll -- call
    /// [`first_refresh()`](Self::first_refresh) and then [`start()`](Self::start).
    pub fn new(
        provider: P,
        hostnames: impl HostnameSource + 'static,
        refresh_interval: Duration,
    ) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Snapshot::new()));
        let (state, _) = watch::channel(CoordinatorState::Idle);
        let (last_update_success, _) = watch::channel(false);
        let (last_refresh, _) = watch::channel(None);

        Self {
            inner: Arc::new(CoordinatorInner {
                provider,
                hostnames: Box::new(hostnames),
                refresh_interval,
                snapshot,
                state,
                last_update_success,
                last_refresh,
                cycle: Mutex::new(()),
                cancel: CancellationToken::new(),
                task_handle: Mutex::new(None),
            }),
        }
    }

    /// Access the status provider.
    pub fn provider(&self) -> &P {
        &self.inner.provider
    }

    pub fn refresh_interval(&self) -> Duration {
        self.inner.refresh_interval
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Run the first cycle synchronously so consumers have data before
    /// first use. A failure here should abort setup.
    pub async fn first_refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        debug!("running first refresh");
        self.refresh().await
    }

    /// Spawn the periodic refresh task. The first tick fires one full
    /// interval from now, since [`first_refresh()`](Self::first_refresh)
    /// already covered the start. No-op if already started, stopped, or the
    /// interval is zero.
    pub async fn start(&self) {
        let mut handle = self.inner.task_handle.lock().await;
        if handle.is_some() || self.inner.cancel.is_cancelled() {
            return;
        }

        let period = self.inner.refresh_interval;
        if period.is_zero() {
            debug!("refresh interval is zero; periodic refresh disabled");
            return;
        }

        let coordinator = self.clone();
        let cancel = self.inner.cancel.clone();
        *handle = Some(tokio::spawn(refresh_task(coordinator, period, cancel)));
        info!(interval_secs = period.as_secs(), "periodic refresh started");
    }

    /// Stop scheduling cycles and release the provider's session.
    ///
    /// An in-flight cycle is allowed to finish, but its result is discarded.
    /// Safe to call more than once.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        if let Some(handle) = self.inner.task_handle.lock().await.take() {
            let _ = handle.await;
        }

        self.inner.provider.shutdown().await;
        self.inner.state.send_replace(CoordinatorState::Stopped);
        debug!("coordinator stopped");
    }

    // ── Refresh cycle ────────────────────────────────────────────

    /// Run one refresh cycle and publish the result.
    ///
    /// On failure the previous snapshot stays current and
    /// [`last_update_success()`](Self::last_update_success) turns false
    /// until the next successful cycle.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        let _cycle = self.inner.cycle.lock().await;
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::Stopped);
        }

        self.inner.state.send_replace(CoordinatorState::Refreshing);
        let result = self.run_cycle().await;

        if self.inner.cancel.is_cancelled() {
            debug!("coordinator stopped during refresh; discarding result");
            self.inner.state.send_replace(CoordinatorState::Stopped);
            return Err(CoreError::Stopped);
        }

        let outcome = match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.inner.snapshot.send_replace(Arc::clone(&snapshot));
                self.inner.last_update_success.send_replace(true);
                self.inner.last_refresh.send_replace(Some(Utc::now()));
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "error communicating with No-IP");
                self.inner.last_update_success.send_replace(false);
                Err(CoreError::refresh_failed(&e))
            }
        };

        // Idle is only observed once the cycle's results are visible.
        self.inner.state.send_replace(CoordinatorState::Idle);
        outcome
    }

    /// Build a fresh snapshot from the current hostname configuration.
    async fn run_cycle(&self) -> Result<Snapshot, CoreError> {
        let hostnames = self.inner.hostnames.hostnames()?;
        debug!(%hostnames, "updating No-IP data");

        if hostnames.is_empty() {
            info!("no hostnames configured; add hostnames to the monitor configuration");
            let hosts = self.inner.provider.list_hosts().await?;
            if !hosts.is_empty() {
                debug!(count = hosts.len(), "retrieved hosts from account");
                return Ok(Snapshot::from(hosts));
            }
            warn!("no hostnames configured and none could be listed from the account");
            return Ok(Snapshot::new());
        }

        // Lookups are independent and never fail, so run them side by side.
        let mut lookups = Vec::with_capacity(hostnames.len());
        for hostname in &hostnames {
            lookups.push(self.inner.provider.host_status(hostname));
        }
        let statuses = join_all(lookups).await;

        let snapshot: Snapshot = hostnames.iter().cloned().zip(statuses).collect();
        info!(
            hosts = snapshot.len(),
            connected = snapshot.connected_count(),
            "updated No-IP data"
        );
        Ok(snapshot)
    }

    // ── State observation ────────────────────────────────────────

    /// The latest published snapshot (empty before the first cycle).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot publications.
    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.inner.snapshot.subscribe())
    }

    /// Whether the most recent cycle succeeded. Drives sensor availability.
    pub fn last_update_success(&self) -> bool {
        *self.inner.last_update_success.borrow()
    }

    /// When the last successful cycle completed.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_refresh.borrow()
    }

    pub fn state(&self) -> CoordinatorState {
        *self.inner.state.borrow()
    }

    /// Subscribe to lifecycle state changes.
    pub fn state_changes(&self) -> watch::Receiver<CoordinatorState> {
        self.inner.state.subscribe()
    }
}

// ── Background task ──────────────────────────────────────────────

/// Refresh on a fixed period between cycle starts until cancelled.
async fn refresh_task<P: StatusProvider>(
    coordinator: Coordinator<P>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = coordinator.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
