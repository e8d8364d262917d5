// ── Domain model ──
//
// Hostname configuration and the per-cycle snapshot.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use noip_api::{HostMap, HostStatus};
use serde::{Deserialize, Serialize};

// ── HostnameSet ──────────────────────────────────────────────────────

/// Ordered, de-duplicated list of hostnames to monitor.
///
/// Entries are trimmed and empty entries dropped on construction, so a set
/// built from `" a.ddns.net, ,b.ddns.net "` holds exactly two names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct HostnameSet(Vec<String>);

impl HostnameSet {
    pub fn new<I, S>(hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: IndexSet<String> = hostnames
            .into_iter()
            .map(|h| h.as_ref().trim().to_owned())
            .filter(|h| !h.is_empty())
            .collect();
        Self(unique.into_iter().collect())
    }

    /// Parse a comma-separated list, e.g. `"example.ddns.net, myhost.hopto.org"`.
    pub fn parse(input: &str) -> Self {
        Self::new(input.split(','))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for HostnameSet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<Vec<String>> for HostnameSet {
    fn from(hostnames: Vec<String>) -> Self {
        Self::new(hostnames)
    }
}

impl From<HostnameSet> for Vec<String> {
    fn from(set: HostnameSet) -> Self {
        set.0
    }
}

impl fmt::Display for HostnameSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl<'a> IntoIterator for &'a HostnameSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ── Snapshot ─────────────────────────────────────────────────────────

/// Statuses of every monitored hostname from one refresh cycle.
///
/// Published behind an `Arc` and never mutated afterwards; the next cycle
/// replaces it wholesale. Iteration follows the configured order, equality
/// does not depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot(HostMap);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hostname: &str) -> Option<&HostStatus> {
        self.0.get(hostname)
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.0.contains_key(hostname)
    }

    pub fn hostnames(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, HostStatus> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of hosts currently reported as connected.
    pub fn connected_count(&self) -> usize {
        self.0.values().filter(|s| s.is_connected()).count()
    }
}

impl From<HostMap> for Snapshot {
    fn from(hosts: HostMap) -> Self {
        Self(hosts)
    }
}

impl FromIterator<(String, HostStatus)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, HostStatus)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a HostStatus);
    type IntoIter = indexmap::map::Iter<'a, String, HostStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_trims_and_drops_empty_entries() {
        let set = HostnameSet::parse(" example.ddns.net, ,myhost.hopto.org ,");
        assert_eq!(set.as_slice(), ["example.ddns.net", "myhost.hopto.org"]);
    }

    #[test]
    fn parse_empty_input_is_empty_set() {
        assert!(HostnameSet::parse("").is_empty());
        assert!(HostnameSet::parse(" , ,").is_empty());
    }

    #[test]
    fn duplicates_keep_first_position() {
        let set = HostnameSet::new(["b.ddns.net", "a.ddns.net", " b.ddns.net"]);
        assert_eq!(set.as_slice(), ["b.ddns.net", "a.ddns.net"]);
        assert_eq!(set.to_string(), "b.ddns.net, a.ddns.net");
    }

    #[test]
    fn deserializes_through_normalization() {
        let set: HostnameSet = serde_json::from_str(r#"[" a.ddns.net ", ""]"#).unwrap();
        assert_eq!(set.as_slice(), ["a.ddns.net"]);
    }

    #[test]
    fn snapshot_equality_ignores_order() {
        let a = HostStatus::connected("a", "1.1.1.1", "good");
        let b = HostStatus::disconnected("b", "Host not found");
        let forward: Snapshot = [("a".into(), a.clone()), ("b".into(), b.clone())]
            .into_iter()
            .collect();
        let reverse: Snapshot = [("b".into(), b), ("a".into(), a)].into_iter().collect();

        assert_eq!(forward, reverse);
        assert_eq!(forward.hostnames().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(forward.connected_count(), 1);
    }

    #[test]
    fn snapshot_serializes_as_map() {
        let snapshot: Snapshot = [(
            "a.ddns.net".to_owned(),
            HostStatus::connected("a.ddns.net", "1.2.3.4", "good"),
        )]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["a.ddns.net"]["ip"], "1.2.3.4");
        assert_eq!(json["a.ddns.net"]["status"], "connected");
    }
}
