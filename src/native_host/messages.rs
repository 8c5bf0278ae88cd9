use crate::backup::{ImportSummary, Snapshot};
use crate::blocked_page::BlockedPageView;
use crate::models::{Decision, NavigationEvent, ScheduleConfig, Settings, Stats};
use crate::notice::Notice;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_increment() -> u64 {
    1
}

/// Every `action` the host answers. Must list each `IncomingMessage` variant.
pub const ACTIONS: &[&str] = &[
    "getStats",
    "updateStats",
    "checkBlockedSites",
    "evaluateNavigation",
    "checkSite",
    "addSite",
    "blockCurrentSite",
    "removeSite",
    "clearSites",
    "getSchedule",
    "setSchedule",
    "getSettings",
    "setSettings",
    "exportData",
    "importData",
    "resetData",
    "getBlockedPage",
    "getNotices",
    "dismissNotice",
];

/// Requests from the extension, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum IncomingMessage {
    GetStats,
    UpdateStats {
        key: String,
        #[serde(default = "default_increment")]
        increment: u64,
    },
    CheckBlockedSites,
    EvaluateNavigation(NavigationEvent),
    CheckSite {
        url: String,
    },
    AddSite {
        domain: String,
    },
    BlockCurrentSite {
        url: String,
    },
    RemoveSite {
        domain: String,
    },
    ClearSites,
    GetSchedule,
    SetSchedule {
        schedule: ScheduleConfig,
    },
    GetSettings,
    SetSettings {
        settings: Settings,
    },
    ExportData,
    ImportData {
        data: Value,
    },
    ResetData,
    GetBlockedPage,
    GetNotices,
    DismissNotice {
        id: u64,
    },
}

/// Replies to the extension. Serialized without a tag: each request knows
/// which shape to expect, and errors always carry an `error` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutgoingMessage {
    Stats(Stats),
    Sites(Vec<String>),
    Navigation {
        #[serde(flatten)]
        decision: Decision,
        #[serde(rename = "tabId")]
        tab_id: i64,
    },
    SiteStatus {
        domain: String,
        blocked: bool,
    },
    SiteUpdated {
        success: bool,
        domain: String,
        changed: bool,
    },
    Schedule(ScheduleConfig),
    Settings(Settings),
    Export {
        #[serde(rename = "fileName")]
        file_name: String,
        /// Pretty-printed backup file, ready to save as `file_name`.
        contents: String,
        snapshot: Snapshot,
    },
    Imported(ImportSummary),
    BlockedPage(BlockedPageView),
    Notices(Vec<Notice>),
    Dismissed {
        dismissed: bool,
    },
    Success {
        success: bool,
    },
    Error {
        error: String,
    },
}

impl OutgoingMessage {
    pub fn success() -> Self {
        OutgoingMessage::Success { success: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        OutgoingMessage::Error { error: message.into() }
    }
}
