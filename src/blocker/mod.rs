use crate::clock::Clock;
use crate::constants::{BLOCKED_PAGE, STAT_BLOCKED_ATTEMPTS};
use crate::models::{web_host, BlockList, Decision, NavigationEvent, ScheduleConfig};
use crate::store::Store;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::sync::Arc;

/// Evaluate the schedule, falling back to "block" when it is malformed.
pub fn should_block_now(now: NaiveDateTime, schedule: &ScheduleConfig) -> bool {
    match schedule.should_block_at(now) {
        Ok(block) => block,
        Err(e) => {
            warn!("Blocking schedule is malformed, blocking anyway: {e}");
            true
        }
    }
}

/// Pure block decision for a navigation. No side effects.
pub fn evaluate_navigation(
    event: &NavigationEvent,
    block_list: &BlockList,
    schedule: &ScheduleConfig,
    now: NaiveDateTime,
) -> Decision {
    if !event.is_top_level() {
        return Decision::Allow;
    }

    let Ok(host) = web_host(&event.url) else {
        return Decision::Allow;
    };

    if block_list.contains(&host) && should_block_now(now, schedule) {
        Decision::Intercept {
            redirect: BLOCKED_PAGE.to_string(),
        }
    } else {
        Decision::Allow
    }
}

/// Store-backed decision pipeline.
///
/// Storage failures never stop a navigation: an unreadable block-list reads
/// as empty and an unreadable schedule as the default (always block).
pub struct Blocker {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl Blocker {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn load_block_list(&self) -> BlockList {
        self.store.get_block_list().unwrap_or_else(|e| {
            warn!("Failed to load block-list, treating as empty: {e}");
            BlockList::new()
        })
    }

    fn load_schedule(&self) -> ScheduleConfig {
        self.store.get_schedule().unwrap_or_else(|e| {
            warn!("Failed to load blocking schedule, using default: {e}");
            ScheduleConfig::default()
        })
    }

    pub fn is_site_blocked(&self, host: &str) -> bool {
        self.load_block_list().contains(host)
    }

    /// Whether the stored schedule is in force right now.
    pub fn schedule_active(&self) -> bool {
        should_block_now(self.clock.local_now(), &self.load_schedule())
    }

    /// Decide a navigation and, on intercept, count the blocked attempt.
    pub fn evaluate_navigation(&self, event: &NavigationEvent) -> Decision {
        if !event.is_top_level() {
            return Decision::Allow;
        }

        let host = match web_host(&event.url) {
            Ok(host) => host,
            Err(e) => {
                debug!("Not evaluating navigation: {e}");
                return Decision::Allow;
            }
        };

        if !self.is_site_blocked(&host) || !self.schedule_active() {
            return Decision::Allow;
        }

        info!("Intercepting navigation to {host} in tab {}", event.tab_id);
        if let Err(e) = self.store.increment_stat(STAT_BLOCKED_ATTEMPTS, 1, self.clock.now()) {
            warn!("Failed to record blocked attempt: {e}");
        }

        Decision::Intercept {
            redirect: BLOCKED_PAGE.to_string(),
        }
    }
}
