use super::Store;
use crate::constants::{KEY_BLOCKED_SITES, KEY_BLOCKING_SCHEDULE, KEY_PIN, KEY_STATS, KEY_STRICT_MODE};
use crate::db::Database;
use crate::error::AppResult;
use crate::models::{AddOutcome, BlockList, ScheduleConfig, Settings, Stats};
use crate::validation::validate_stat_name;
use chrono::{DateTime, Utc};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// `Store` over a SQLite table of JSON values.
///
/// All access goes through one mutex, so each operation (including the
/// read-modify-write ones) runs alone: concurrent counter bumps never lose
/// updates.
pub struct SqliteStore {
    db: Arc<Mutex<Database>>,
}

impl SqliteStore {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn lock_db(&self) -> MutexGuard<'_, Database> {
        match self.db.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("SqliteStore: database mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> AppResult<T> {
        let db = self.lock_db();
        Ok(read_value(db.connection(), key)?.unwrap_or_default())
    }

    fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let db = self.lock_db();
        write_value(db.connection(), key, value)
    }

    /// Read, modify and write back one key inside a transaction.
    fn modify<T, R, F>(&self, key: &str, f: F) -> AppResult<R>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> R,
    {
        let db = self.lock_db();
        let tx = db.connection().unchecked_transaction()?;
        let mut value: T = read_value(&tx, key)?.unwrap_or_default();
        let result = f(&mut value);
        write_value(&tx, key, &value)?;
        tx.commit()?;
        Ok(result)
    }
}

fn read_value<T: DeserializeOwned>(conn: &Connection, key: &str) -> AppResult<Option<T>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM store WHERE key = ?1", params![key], |row| row.get(0))
        .optional()?;

    match raw {
        // A stored JSON null reads the same as a missing key.
        Some(raw) => Ok(serde_json::from_str::<Option<T>>(&raw)?),
        None => Ok(None),
    }
}

fn write_value<T: Serialize + ?Sized>(conn: &Connection, key: &str, value: &T) -> AppResult<()> {
    let json = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO store (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, json],
    )?;
    Ok(())
}

impl Store for SqliteStore {
    fn get_block_list(&self) -> AppResult<BlockList> {
        self.get_or_default(KEY_BLOCKED_SITES)
    }

    fn set_block_list(&self, list: &BlockList) -> AppResult<()> {
        self.put(KEY_BLOCKED_SITES, list)
    }

    fn add_site(&self, domain: &str) -> AppResult<AddOutcome> {
        self.modify(KEY_BLOCKED_SITES, |list: &mut BlockList| list.add(domain))
    }

    fn remove_site(&self, domain: &str) -> AppResult<bool> {
        self.modify(KEY_BLOCKED_SITES, |list: &mut BlockList| list.remove(domain))
    }

    fn get_schedule(&self) -> AppResult<ScheduleConfig> {
        self.get_or_default(KEY_BLOCKING_SCHEDULE)
    }

    fn set_schedule(&self, schedule: &ScheduleConfig) -> AppResult<()> {
        self.put(KEY_BLOCKING_SCHEDULE, schedule)
    }

    fn get_stats(&self) -> AppResult<Stats> {
        self.get_or_default(KEY_STATS)
    }

    fn set_stats(&self, stats: &Stats) -> AppResult<()> {
        self.put(KEY_STATS, stats)
    }

    fn increment_stat(&self, name: &str, delta: u64, now: DateTime<Utc>) -> AppResult<Stats> {
        validate_stat_name(name)?;
        self.modify(KEY_STATS, |stats: &mut Stats| {
            stats.increment(name, delta, now);
            stats.clone()
        })
    }

    fn get_settings(&self) -> AppResult<Settings> {
        let db = self.lock_db();
        let conn = db.connection();
        Ok(Settings {
            pin: read_value(conn, KEY_PIN)?,
            strict_mode: read_value(conn, KEY_STRICT_MODE)?.unwrap_or(false),
        })
    }

    fn set_settings(&self, settings: &Settings) -> AppResult<()> {
        let db = self.lock_db();
        let tx = db.connection().unchecked_transaction()?;
        write_value(&tx, KEY_PIN, &settings.pin)?;
        write_value(&tx, KEY_STRICT_MODE, &settings.strict_mode)?;
        tx.commit()?;
        Ok(())
    }

    fn restore(&self, list: &BlockList, stats: Option<&Stats>) -> AppResult<()> {
        let db = self.lock_db();
        let tx = db.connection().unchecked_transaction()?;
        write_value(&tx, KEY_BLOCKED_SITES, list)?;
        if let Some(stats) = stats {
            write_value(&tx, KEY_STATS, stats)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        let db = self.lock_db();
        db.connection().execute("DELETE FROM store", [])?;
        Ok(())
    }
}
