use super::schema::SCHEMA;
use crate::constants::{
    KEY_BLOCKED_SITES, KEY_BLOCKING_SCHEDULE, KEY_PIN, KEY_STATS, KEY_STRICT_MODE,
};
use crate::error::AppResult;
use crate::models::{BlockList, ScheduleConfig, Stats};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// Create tables and, on first run, write the install defaults.
pub fn run(conn: &Connection, now: DateTime<Utc>) -> AppResult<()> {
    conn.execute_batch(SCHEMA)?;
    seed_install_defaults(conn, now)?;
    Ok(())
}

fn seed_install_defaults(conn: &Connection, now: DateTime<Utc>) -> AppResult<()> {
    let installed: Option<String> = conn
        .query_row("SELECT installed_at FROM install WHERE id = 1", [], |row| row.get(0))
        .optional()?;

    if installed.is_some() {
        return Ok(());
    }

    let defaults = [
        (KEY_BLOCKED_SITES, serde_json::to_string(&BlockList::new())?),
        (KEY_BLOCKING_SCHEDULE, serde_json::to_string(&ScheduleConfig::install_default())?),
        (KEY_STATS, serde_json::to_string(&Stats::install_default(now))?),
        (KEY_PIN, serde_json::to_string(&None::<String>)?),
        (KEY_STRICT_MODE, serde_json::to_string(&false)?),
    ];

    let tx = conn.unchecked_transaction()?;
    for (key, value) in &defaults {
        tx.execute(
            "INSERT OR IGNORE INTO store (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }
    tx.execute(
        "INSERT INTO install (id, installed_at) VALUES (1, ?1)",
        params![now.to_rfc3339()],
    )?;
    tx.commit()?;

    log::info!("Install defaults written");
    Ok(())
}
