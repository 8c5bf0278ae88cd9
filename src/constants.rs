// src/constants.rs

/// Store key holding the block-list (JSON array of domains).
pub const KEY_BLOCKED_SITES: &str = "blockedSites";

/// Store key holding the usage counters.
pub const KEY_STATS: &str = "stats";

/// Store key holding the blocking schedule.
pub const KEY_BLOCKING_SCHEDULE: &str = "blockingSchedule";

/// Reserved store key for the PIN (persisted, never enforced).
pub const KEY_PIN: &str = "pin";

/// Reserved store key for strict mode (persisted, never enforced).
pub const KEY_STRICT_MODE: &str = "strictMode";

/// Counter bumped every time a navigation is intercepted.
pub const STAT_BLOCKED_ATTEMPTS: &str = "blockedAttempts";

/// Counter bumped when a new domain joins the block-list.
pub const STAT_SITES_BLOCKED: &str = "sitesBlocked";

/// Counter bumped when a domain leaves the block-list.
pub const STAT_SITES_UNBLOCKED: &str = "sitesUnblocked";

/// Timestamp field stored alongside the counters. Never a counter name.
pub const STAT_LAST_UPDATED: &str = "lastUpdated";

/// Extension-relative page a blocked navigation is redirected to.
pub const BLOCKED_PAGE: &str = "blocked.html";

/// Maximum domain length (RFC 1035 presentation form).
pub const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single domain label.
pub const MAX_LABEL_LEN: usize = 63;

/// Chrome limits native messages sent to the host to 1MB (1024 * 1024 bytes)
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// How long a notice stays visible before it is dropped.
pub const NOTICE_TTL_SECS: i64 = 3;

/// Prefix of exported backup file names.
pub const BACKUP_FILE_PREFIX: &str = "deepfocus-backup";
