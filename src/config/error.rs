// ==========================================
// Reagent Inventory - Config error types
// ==========================================
// Tooling: thiserror
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("config lock poisoned: {0}")]
    LockError(String),

    #[error("invalid config value (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("config snapshot malformed: {0}")]
    SnapshotError(#[from] serde_json::Error),

    #[error("no data directory available for the database")]
    NoDataDir,

    #[error("config io failed: {0}")]
    IoError(#[from] std::io::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
