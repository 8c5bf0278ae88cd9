use serde::{Deserialize, Serialize};

/// Reserved settings. Both fields are persisted and handed back to the
/// extension but nothing enforces them yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub strict_mode: bool,
}
