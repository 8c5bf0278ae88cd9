//! Shared test utilities for DeepFocus.
//!
//! This module provides common setup functions used across test modules.

#![cfg(test)]

use crate::clock::Clock;
use crate::db::{migrations, Database};
use crate::store::SqliteStore;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

/// Create a temporary test database with migrations applied.
///
/// The TempDir must be kept alive for the duration of the test to prevent
/// the database file from being deleted.
pub fn setup_test_db() -> (Arc<Mutex<Database>>, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test DB");
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).expect("Failed to open test database");
    migrations::run(db.connection(), ts(0)).expect("Failed to run migrations on test DB");
    (Arc::new(Mutex::new(db)), dir)
}

/// A `SqliteStore` over a fresh test database. The raw database handle is
/// returned too so tests can tamper with stored values.
pub fn setup_test_store() -> (SqliteStore, Arc<Mutex<Database>>, TempDir) {
    let (db, dir) = setup_test_db();
    (SqliteStore::new(Arc::clone(&db)), db, dir)
}

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
}

pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .expect("valid local time")
}

/// Clock that only moves when told to. Local time and UTC coincide.
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.local_now())
    }

    fn local_now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}
