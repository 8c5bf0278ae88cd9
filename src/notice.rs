use crate::clock::Clock;
use crate::constants::NOTICE_TTL_SECS;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    Warning,
}

/// A transient, auto-dismissing message for the extension UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    notices: Vec<Notice>,
}

/// Notices with deadlines. Expiry is driven by the injected clock rather
/// than background timers, and any notice can be dismissed early.
pub struct NoticeBoard {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    inner: Mutex<Inner>,
}

impl NoticeBoard {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(clock, Duration::seconds(NOTICE_TTL_SECS))
    }

    pub fn with_ttl(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Post a notice. Returns its id for early dismissal.
    pub fn post(&self, kind: NoticeKind, message: impl Into<String>) -> u64 {
        let now = self.clock.now();
        let expires_at = now + self.ttl;
        let mut inner = self.lock();
        inner.notices.retain(|n| n.expires_at > now);
        inner.next_id += 1;
        let id = inner.next_id;
        inner.notices.push(Notice {
            id,
            kind,
            message: message.into(),
            expires_at,
        });
        id
    }

    /// Cancel a notice before it expires. Returns whether it was still pending.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut inner = self.lock();
        let before = inner.notices.len();
        inner.notices.retain(|n| n.id != id);
        inner.notices.len() != before
    }

    /// Drop expired notices and return the rest, oldest first.
    pub fn active(&self) -> Vec<Notice> {
        let now = self.clock.now();
        let mut inner = self.lock();
        inner.notices.retain(|n| n.expires_at > now);
        inner.notices.clone()
    }
}
