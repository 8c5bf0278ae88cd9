use crate::constants::{STAT_BLOCKED_ATTEMPTS, STAT_SITES_BLOCKED};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Usage counters plus the time of the last change.
///
/// Serialized flat, e.g. `{"blockedAttempts": 3, "lastUpdated": "..."}`, so
/// `lastUpdated` can never be a counter name (see `validate_stat_name`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub counters: BTreeMap<String, u64>,
}

impl Stats {
    /// Counters written on first install.
    pub fn install_default(now: DateTime<Utc>) -> Self {
        let mut counters = BTreeMap::new();
        counters.insert(STAT_SITES_BLOCKED.to_string(), 0);
        counters.insert(STAT_BLOCKED_ATTEMPTS.to_string(), 0);
        Self {
            last_updated: Some(now),
            counters,
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Add `delta` to a counter (creating it at zero) and touch `last_updated`.
    pub fn increment(&mut self, name: &str, delta: u64, now: DateTime<Utc>) {
        let counter = self.counters.entry(name.to_string()).or_insert(0);
        *counter = counter.saturating_add(delta);
        self.last_updated = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_increment_creates_and_touches() {
        let mut stats = Stats::default();
        assert_eq!(stats.get(STAT_BLOCKED_ATTEMPTS), 0);

        stats.increment(STAT_BLOCKED_ATTEMPTS, 1, ts(100));
        stats.increment(STAT_BLOCKED_ATTEMPTS, 1, ts(200));

        assert_eq!(stats.get(STAT_BLOCKED_ATTEMPTS), 2);
        assert_eq!(stats.last_updated, Some(ts(200)));
    }

    #[test]
    fn test_increment_saturates() {
        let mut stats = Stats::default();
        stats.increment("x", u64::MAX, ts(1));
        stats.increment("x", 5, ts(2));
        assert_eq!(stats.get("x"), u64::MAX);
    }

    #[test]
    fn test_flat_wire_format() {
        let stats = Stats::install_default(ts(0));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["sitesBlocked"], 0);
        assert_eq!(json["blockedAttempts"], 0);
        assert_eq!(json["lastUpdated"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_reads_browser_iso_timestamps() {
        let stats: Stats = serde_json::from_str(
            r#"{"blockedAttempts": 7, "lastUpdated": "2024-03-01T10:15:30.123Z"}"#,
        )
        .unwrap();
        assert_eq!(stats.get(STAT_BLOCKED_ATTEMPTS), 7);
        assert!(stats.last_updated.is_some());
    }
}
