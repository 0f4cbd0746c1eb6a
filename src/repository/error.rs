// ==========================================
// Reagent Inventory - Repository error types
// ==========================================
// Tooling: thiserror
// ==========================================

use thiserror::Error;

/// Document store errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== Database =====
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database lock poisoned: {0}")]
    LockError(String),

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    #[error("database query failed: {0}")]
    DatabaseQueryError(String),

    #[error("unique constraint violated: {0}")]
    UniqueConstraintViolation(String),

    // ===== Documents =====
    #[error("invalid document body: {0}")]
    InvalidDocument(String),

    #[error("document decode failed ({collection}/{id}): {message}")]
    DecodeError {
        collection: String,
        id: String,
        message: String,
    },

    // ===== Generic =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                collection: "unknown".to_string(),
                id: "unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::InvalidDocument(err.to_string())
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;
