use thiserror::Error;

/// Coarse classification used to decide how a failure is recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Read/write failure of the store. Callers fall back to defaults.
    Storage,
    /// Malformed schedule configuration. Navigation falls back to blocking.
    Config,
    /// Malformed URL, domain or import payload.
    Parse,
}

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid stored value: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Invalid URL '{url}'")]
    InvalidUrl { url: String },

    #[error("{reason}")]
    InvalidDomain { reason: String },

    #[error("Invalid data file: {reason}")]
    InvalidImport { reason: String },

    #[error("'{name}' is not a counter")]
    InvalidStat { name: String },
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Database(_) | AppError::Serialization(_) => ErrorKind::Storage,
            AppError::InvalidConfig { .. } => ErrorKind::Config,
            AppError::InvalidUrl { .. }
            | AppError::InvalidDomain { .. }
            | AppError::InvalidImport { .. }
            | AppError::InvalidStat { .. } => ErrorKind::Parse,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
