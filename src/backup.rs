//! Export and import of the block-list and counters as a JSON backup.

use crate::constants::BACKUP_FILE_PREFIX;
use crate::error::{AppError, AppResult};
use crate::models::{BlockList, Stats};
use crate::store::Store;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Backup file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub blocked_sites: Vec<String>,
    pub stats: Stats,
    pub export_date: DateTime<Utc>,
}

impl Snapshot {
    /// e.g. `deepfocus-backup-2024-01-02.json`
    pub fn file_name(&self) -> String {
        format!("{BACKUP_FILE_PREFIX}-{}.json", self.export_date.format("%Y-%m-%d"))
    }

    pub fn to_pretty_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub sites_imported: usize,
    pub stats_imported: bool,
}

pub fn export(store: &dyn Store, now: DateTime<Utc>) -> AppResult<Snapshot> {
    Ok(Snapshot {
        blocked_sites: store.get_block_list()?.into_domains(),
        stats: store.get_stats()?,
        export_date: now,
    })
}

/// Apply a backup.
///
/// Only the shape is checked: `blockedSites` must be an array of strings. The
/// list replaces the current one as-is. `stats` is restored when present and
/// well-formed, and skipped otherwise.
pub fn import(store: &dyn Store, data: &Value) -> AppResult<ImportSummary> {
    let invalid = |reason: &str| AppError::InvalidImport { reason: reason.into() };

    let sites = data
        .get("blockedSites")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("blockedSites must be an array"))?;

    let domains = sites
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| invalid("blockedSites must contain only strings"))?;

    let stats = match data.get("stats") {
        Some(Value::Null) | None => None,
        Some(raw) => match Stats::deserialize(raw) {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("Ignoring malformed stats in backup: {e}");
                None
            }
        },
    };

    let sites_imported = domains.len();
    let stats_imported = stats.is_some();
    store.restore(&BlockList::from_raw(domains), stats.as_ref())?;

    info!("Imported {sites_imported} blocked sites (stats restored: {stats_imported})");
    Ok(ImportSummary {
        sites_imported,
        stats_imported,
    })
}

/// Parse backup file text and apply it.
pub fn import_str(store: &dyn Store, text: &str) -> AppResult<ImportSummary> {
    let data: Value = serde_json::from_str(text).map_err(|e| AppError::InvalidImport {
        reason: e.to_string(),
    })?;
    import(store, &data)
}

/// Apply a backup sent either as the parsed object or as the raw file text.
pub fn import_payload(store: &dyn Store, payload: &Value) -> AppResult<ImportSummary> {
    match payload.as_str() {
        Some(text) => import_str(store, text),
        None => import(store, payload),
    }
}

/// Wipe every stored key.
pub fn reset(store: &dyn Store) -> AppResult<()> {
    store.clear()?;
    info!("All data reset");
    Ok(())
}
