//! Persistent key-value store behind the blocker and the message handler.
//!
//! Every value is read and written whole. Implementations must make the
//! read-modify-write operations (`add_site`, `remove_site`, `increment_stat`)
//! atomic with respect to each other.

mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::AppResult;
use crate::models::{AddOutcome, BlockList, ScheduleConfig, Settings, Stats};
use chrono::{DateTime, Utc};

pub trait Store: Send + Sync {
    // Block-list

    /// Load the block-list, empty when never written.
    fn get_block_list(&self) -> AppResult<BlockList>;

    /// Replace the block-list wholesale.
    fn set_block_list(&self, list: &BlockList) -> AppResult<()>;

    /// Append a domain unless present.
    fn add_site(&self, domain: &str) -> AppResult<AddOutcome>;

    /// Remove a domain. Returns whether it was listed.
    fn remove_site(&self, domain: &str) -> AppResult<bool>;

    // Schedule

    fn get_schedule(&self) -> AppResult<ScheduleConfig>;

    fn set_schedule(&self, schedule: &ScheduleConfig) -> AppResult<()>;

    // Stats

    fn get_stats(&self) -> AppResult<Stats>;

    fn set_stats(&self, stats: &Stats) -> AppResult<()>;

    /// Add `delta` to a counter and touch `lastUpdated`. Returns the new stats.
    ///
    /// Rejects names that would collide with the `lastUpdated` field.
    fn increment_stat(&self, name: &str, delta: u64, now: DateTime<Utc>) -> AppResult<Stats>;

    // Reserved settings

    fn get_settings(&self) -> AppResult<Settings>;

    fn set_settings(&self, settings: &Settings) -> AppResult<()>;

    // Backup

    /// Replace the block-list and, when given, the stats in one atomic write.
    fn restore(&self, list: &BlockList, stats: Option<&Stats>) -> AppResult<()>;

    /// Drop every key.
    fn clear(&self) -> AppResult<()>;
}
