use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// A navigation reported by the browser. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub tab_id: i64,
    pub url: String,
    /// 0 for the top-level frame.
    pub frame_id: i64,
}

impl NavigationEvent {
    pub fn is_top_level(&self) -> bool {
        self.frame_id == 0
    }
}

/// Outcome of evaluating a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum Decision {
    Allow,
    Intercept { redirect: String },
}

impl Decision {
    pub fn is_intercept(&self) -> bool {
        matches!(self, Decision::Intercept { .. })
    }
}

/// Parse a URL and return its lower-cased host.
pub fn extract_host(url: &str) -> AppResult<String> {
    let parsed = Url::parse(url).map_err(|_| AppError::InvalidUrl { url: url.to_string() })?;
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_lowercase)
        .ok_or_else(|| AppError::InvalidUrl { url: url.to_string() })
}

/// Host of an `http`/`https` URL, the only schemes navigation blocking looks at.
pub fn web_host(url: &str) -> AppResult<String> {
    let parsed = Url::parse(url).map_err(|_| AppError::InvalidUrl { url: url.to_string() })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::InvalidUrl { url: url.to_string() });
    }
    extract_host(url)
}
