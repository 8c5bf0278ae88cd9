pub mod backup;
pub mod blocked_page;
pub mod blocker;
pub mod clock;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod native_host;
pub mod notice;
pub mod store;
#[cfg(test)]
mod test_utils;
pub mod validation;

use crate::clock::SystemClock;
use crate::db::{migrations, Database};
use crate::native_host::NativeHost;
use crate::store::SqliteStore;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use log::info;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Overrides the database location, mainly for running the host by hand.
pub const DB_PATH_ENV: &str = "DEEPFOCUS_DB";

/// Error type for DeepFocus initialization failures
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Could not determine project directories")]
    NoProjectDirs,
    #[error("Could not create data directory: {0}")]
    DataDirCreation(std::io::Error),
    #[error("Failed to open database: {0}")]
    DatabaseOpen(rusqlite::Error),
    #[error("Failed to run database migrations: {0}")]
    Migration(error::AppError),
}

/// Get the database path, creating the data directory if needed.
pub fn db_path() -> Result<PathBuf, InitError> {
    if let Some(path) = std::env::var_os(DB_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let proj_dirs = ProjectDirs::from("com", "deepfocus", "DeepFocus").ok_or(InitError::NoProjectDirs)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(InitError::DataDirCreation)?;
    Ok(data_dir.join("deepfocus.db"))
}

/// Open (and on first run, seed) the store and wire up a native host over it.
pub fn open_host(now: DateTime<Utc>) -> Result<NativeHost, InitError> {
    let path = db_path()?;
    let db = Database::open(&path).map_err(InitError::DatabaseOpen)?;
    migrations::run(db.connection(), now).map_err(InitError::Migration)?;
    info!("Using database at {}", path.display());

    let store = SqliteStore::new(Arc::new(Mutex::new(db)));
    Ok(NativeHost::new(Arc::new(store), Arc::new(SystemClock)))
}
