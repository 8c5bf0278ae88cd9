use crate::constants::{STAT_BLOCKED_ATTEMPTS, STAT_SITES_BLOCKED};
use crate::models::Stats;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MOTIVATIONAL_QUOTES: &[&str] = &[
    "Every minute you spend focused is an investment in your future",
    "Concentration is the key to success",
    "Your time is your most valuable resource",
    "Small actions, big results",
    "Focus is the difference between success and failure",
    "Discipline is the bridge between goals and accomplishment",
    "Every distraction is a lost opportunity",
    "Your future is built by today's decisions",
    "Consistency is more powerful than perfection",
    "Every 'no' to a distraction is a 'yes' to your goals",
];

/// Everything the blocked page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedPageView {
    pub blocked_attempts: u64,
    pub sites_blocked: u64,
    pub quote: &'static str,
}

impl BlockedPageView {
    pub fn new(stats: &Stats, now: DateTime<Utc>) -> Self {
        Self {
            blocked_attempts: stats.get(STAT_BLOCKED_ATTEMPTS),
            sites_blocked: stats.get(STAT_SITES_BLOCKED),
            quote: pick_quote(now),
        }
    }
}

/// Pick a quote from the sub-second part of `now`.
pub fn pick_quote(now: DateTime<Utc>) -> &'static str {
    let seed = usize::try_from(now.timestamp_subsec_millis()).unwrap_or_default();
    MOTIVATIONAL_QUOTES
        .get(seed % MOTIVATIONAL_QUOTES.len())
        .copied()
        .unwrap_or_default()
}
