#![allow(clippy::unwrap_used)]
// Coordinator tests against a stub provider and, end to end, a wiremock server.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::watch;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use noip_api::{Error, HostMap, HostStatus, classify};
use noip_core::{
    ConnectionStatus, Coordinator, CoordinatorState, CoreError, Credentials, HostnameSet,
    HostnameSource, MonitorConfig, SensorPlatform, Snapshot, StatusProvider,
};

// ── Stub provider ───────────────────────────────────────────────────

/// Answers each hostname with a canned response body.
#[derive(Default)]
struct StubProvider {
    bodies: HashMap<String, String>,
    listed: HostMap,
    list_fails: bool,
    lookups: Mutex<Vec<String>>,
    shutdowns: AtomicUsize,
}

impl StubProvider {
    fn with_bodies(bodies: &[(&str, &str)]) -> Self {
        Self {
            bodies: bodies
                .iter()
                .map(|(h, b)| ((*h).to_owned(), (*b).to_owned()))
                .collect(),
            ..Self::default()
        }
    }

    fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

impl StatusProvider for StubProvider {
    fn host_status(&self, hostname: &str) -> impl Future<Output = HostStatus> + Send {
        self.lookups.lock().unwrap().push(hostname.to_owned());
        let body = self.bodies.get(hostname).cloned().unwrap_or_default();
        let status = classify(hostname, 200, &body);
        async move { status }
    }

    fn list_hosts(&self) -> impl Future<Output = Result<HostMap, Error>> + Send {
        let result = if self.list_fails {
            Err(Error::Timeout { timeout_secs: 30 })
        } else {
            Ok(self.listed.clone())
        };
        async move { result }
    }

    fn validate_credentials(&self) -> impl Future<Output = bool> + Send {
        async { true }
    }

    fn shutdown(&self) -> impl Future<Output = ()> + Send {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        async {}
    }
}

/// Hostname source that fails while `broken` is set.
struct FlakySource {
    hostnames: HostnameSet,
    broken: watch::Receiver<bool>,
}

impl HostnameSource for FlakySource {
    fn hostnames(&self) -> Result<HostnameSet, CoreError> {
        if *self.broken.borrow() {
            return Err(CoreError::Config {
                message: "config file unreadable".into(),
            });
        }
        Ok(self.hostnames.clone())
    }
}

fn hosts(list: &[&str]) -> HostnameSet {
    HostnameSet::new(list.iter().copied())
}

fn coordinator(provider: StubProvider, source: impl HostnameSource + 'static) -> Coordinator<StubProvider> {
    Coordinator::new(provider, source, Duration::from_secs(300))
}

// ── Refresh cycle ───────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_builds_snapshot_per_hostname() {
    let provider =
        StubProvider::with_bodies(&[("a.ddns.net", "good 1.2.3.4"), ("b.ddns.net", "nohost")]);
    let coord = coordinator(provider, hosts(&["a.ddns.net", "b.ddns.net"]));

    let snapshot = coord.first_refresh().await.unwrap();

    let expected: Snapshot = [
        (
            "a.ddns.net".to_owned(),
            HostStatus::connected("a.ddns.net", "1.2.3.4", "good"),
        ),
        (
            "b.ddns.net".to_owned(),
            HostStatus::disconnected("b.ddns.net", "Host not found"),
        ),
    ]
    .into_iter()
    .collect();
    assert_eq!(*snapshot, expected);
    assert_eq!(snapshot.hostnames().collect::<Vec<_>>(), ["a.ddns.net", "b.ddns.net"]);
    assert_eq!(*coord.snapshot(), expected);
    assert!(coord.last_update_success());
    assert!(coord.last_refresh().is_some());
    assert_eq!(coord.state(), CoordinatorState::Idle);
}

#[tokio::test]
async fn test_empty_hostnames_yield_empty_snapshot() {
    let coord = coordinator(StubProvider::default(), HostnameSet::default());

    let snapshot = coord.refresh().await.unwrap();

    assert!(snapshot.is_empty());
    assert!(coord.last_update_success());
    assert_eq!(coord.provider().lookup_count(), 0);
}

#[tokio::test]
async fn test_empty_hostnames_publish_listed_hosts() {
    let mut provider = StubProvider::default();
    provider.listed.insert(
        "listed.ddns.net".into(),
        HostStatus::connected("listed.ddns.net", "5.6.7.8", "nochg"),
    );
    let coord = coordinator(provider, HostnameSet::default());

    let snapshot = coord.refresh().await.unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(
        snapshot.get("listed.ddns.net").unwrap().ip.as_deref(),
        Some("5.6.7.8")
    );
}

#[tokio::test]
async fn test_consecutive_cycles_replace_snapshot() {
    let provider =
        StubProvider::with_bodies(&[("a.ddns.net", "good 1.2.3.4"), ("c.ddns.net", "abuse")]);
    let (tx, rx) = watch::channel(hosts(&["a.ddns.net"]));
    let coord = coordinator(provider, rx);

    let first = coord.refresh().await.unwrap();
    assert!(first.contains("a.ddns.net"));

    tx.send_replace(hosts(&["c.ddns.net"]));
    let second = coord.refresh().await.unwrap();

    assert_eq!(second.len(), 1);
    assert!(!second.contains("a.ddns.net"));
    assert_eq!(
        second.get("c.ddns.net").unwrap().error.as_deref(),
        Some("Account blocked for abuse")
    );
}

#[tokio::test]
async fn test_cycle_fault_keeps_previous_snapshot() {
    let provider = StubProvider::with_bodies(&[("a.ddns.net", "good 1.2.3.4")]);
    let (broken_tx, broken_rx) = watch::channel(false);
    let source = FlakySource {
        hostnames: hosts(&["a.ddns.net"]),
        broken: broken_rx,
    };
    let coord = coordinator(provider, source);

    let good = coord.refresh().await.unwrap();

    broken_tx.send_replace(true);
    let err = coord.refresh().await.unwrap_err();
    assert!(
        matches!(&err, CoreError::RefreshFailed { message } if message.contains("config file unreadable")),
        "unexpected error: {err:?}"
    );
    assert!(!coord.last_update_success());
    assert_eq!(coord.snapshot(), good);

    broken_tx.send_replace(false);
    coord.refresh().await.unwrap();
    assert!(coord.last_update_success());
}

#[tokio::test]
async fn test_enumeration_fault_fails_cycle() {
    let provider = StubProvider {
        list_fails: true,
        ..StubProvider::default()
    };
    let coord = coordinator(provider, HostnameSet::default());

    let result = coord.first_refresh().await;

    assert!(matches!(result, Err(CoreError::RefreshFailed { .. })));
    assert!(!coord.last_update_success());
    assert!(coord.snapshot().is_empty());
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_periodic_refresh_every_interval() {
    let provider = StubProvider::with_bodies(&[("a.ddns.net", "good 1.2.3.4")]);
    let coord = coordinator(provider, hosts(&["a.ddns.net"]));

    coord.first_refresh().await.unwrap();
    coord.start().await;
    coord.start().await; // second start is a no-op

    tokio::time::sleep(Duration::from_secs(601)).await;
    assert_eq!(coord.provider().lookup_count(), 3);

    coord.shutdown().await;
    tokio::time::sleep(Duration::from_secs(900)).await;
    assert_eq!(coord.provider().lookup_count(), 3);
}

#[tokio::test]
async fn test_shutdown_is_idempotent_and_final() {
    let coord = coordinator(StubProvider::default(), hosts(&["a.ddns.net"]));

    coord.shutdown().await;
    coord.shutdown().await;

    assert_eq!(coord.state(), CoordinatorState::Stopped);
    assert_eq!(coord.provider().shutdowns.load(Ordering::SeqCst), 2);
    assert!(matches!(coord.refresh().await, Err(CoreError::Stopped)));
}

#[tokio::test]
async fn test_subscribers_see_each_publication() {
    let provider = StubProvider::with_bodies(&[("a.ddns.net", "nochg 9.9.9.9")]);
    let coord = coordinator(provider, hosts(&["a.ddns.net"]));
    let mut stream = coord.subscribe();
    assert!(stream.current().is_empty());

    coord.refresh().await.unwrap();

    let snap = tokio::time::timeout(Duration::from_secs(1), stream.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snap.get("a.ddns.net").unwrap().ip.as_deref(), Some("9.9.9.9"));
    assert_eq!(stream.latest(), snap);
}

// ── Sensor platform ─────────────────────────────────────────────────

#[tokio::test]
async fn test_sensor_platform_adds_only_new_hostnames() {
    let provider = StubProvider::with_bodies(&[
        ("a.ddns.net", "good 1.2.3.4"),
        ("b.ddns.net", "nohost"),
    ]);
    let (tx, rx) = watch::channel(hosts(&["a.ddns.net"]));
    let coord = coordinator(provider, rx);
    coord.first_refresh().await.unwrap();

    let mut platform = SensorPlatform::new(coord.clone(), "entry", "alice");
    assert_eq!(platform.sensors().len(), 1);
    assert_eq!(platform.device().name, "NoIP Monitor (alice)");

    tx.send_replace(hosts(&["a.ddns.net", "b.ddns.net"]));
    let snapshot = coord.refresh().await.unwrap();
    let added = platform.sync(&snapshot);

    assert_eq!(added.len(), 1);
    assert_eq!(added[0].unique_id(), "entry_b.ddns.net");
    assert!(platform.sync(&snapshot).is_empty());

    let states = platform.render_all();
    assert_eq!(states.len(), 2);
    assert_eq!(states[0].value, "1.2.3.4");
    assert_eq!(states[0].icon, "mdi:lan-connect");
    assert_eq!(states[1].value, "Disconnected");
    assert!(states.iter().all(|s| s.available));
}

// ── End to end over HTTP ────────────────────────────────────────────

#[tokio::test]
async fn test_timeout_for_one_host_does_not_block_others() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nic/update"))
        .and(query_param("hostname", "slow.ddns.net"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("good 1.1.1.1")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nic/update"))
        .and(query_param("hostname", "fast.ddns.net"))
        .respond_with(ResponseTemplate::new(200).set_body_string("nochg 2.2.2.2"))
        .mount(&server)
        .await;

    let mut config = MonitorConfig::new(Credentials::new("user", "pass"));
    config.base_url = format!("{}/nic/update", server.uri());
    config.timeout = Duration::from_millis(200);

    let coord = Coordinator::from_config(&config, hosts(&["slow.ddns.net", "fast.ddns.net"]));
    let snapshot = coord.first_refresh().await.unwrap();

    assert_eq!(
        *snapshot.get("slow.ddns.net").unwrap(),
        HostStatus::disconnected("slow.ddns.net", "Timeout")
    );
    let fast = snapshot.get("fast.ddns.net").unwrap();
    assert_eq!(fast.status, ConnectionStatus::Connected);
    assert_eq!(fast.ip.as_deref(), Some("2.2.2.2"));
    assert!(coord.last_update_success());

    coord.shutdown().await;
    assert!(!coord.provider().has_session().await);
}
