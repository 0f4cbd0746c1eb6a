// ==========================================
// Reagent Inventory - API error types
// ==========================================
// Layer errors folded into caller-facing categories.
// Import failures keep their cause but never a per-row report.
// ==========================================

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ===== Session =====
    #[error("sign-in required")]
    Unauthorized,

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    // ===== Input =====
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    // ===== Import =====
    #[error("import failed: {0}")]
    ImportError(String),

    // ===== Storage =====
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("database transaction failed: {0}")]
    DatabaseTransactionError(String),

    #[error("invalid stored data: {0}")]
    InvalidData(String),

    // ===== Config =====
    #[error("config error: {0}")]
    ConfigError(String),

    // ===== Generic =====
    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { collection, id } => {
                ApiError::NotFound(format!("{}/{}", collection, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("lock poisoned: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InvalidDocument(msg) => ApiError::InvalidInput(msg),
            RepositoryError::DecodeError { collection, id, message } => {
                ApiError::InvalidData(format!("{}/{}: {}", collection, id, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Store(repo_err) => ApiError::ImportError(repo_err.to_string()),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated => ApiError::Unauthorized,
            AuthError::StoreError(msg) => ApiError::DatabaseError(msg),
            AuthError::LockError(msg) => ApiError::DatabaseConnectionError(msg),
            other => ApiError::AuthFailed(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err: ApiError = RepositoryError::NotFound {
            collection: "reagents".to_string(),
            id: "r1".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::NotFound(ref s) if s == "reagents/r1"));
    }

    #[test]
    fn test_undecodable_document_is_invalid_data() {
        let err: ApiError = RepositoryError::DecodeError {
            collection: "reagents".to_string(),
            id: "r1".to_string(),
            message: "duplicate field `locationId`".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::InvalidData(ref s) if s.starts_with("reagents/r1")));
    }

    #[test]
    fn test_import_errors_are_single_outcome() {
        let err: ApiError = ImportError::NoValidRows { total_rows: 4 }.into();
        assert!(matches!(err, ApiError::ImportError(_)));
    }

    #[test]
    fn test_auth_not_authenticated_is_unauthorized() {
        let err: ApiError = AuthError::NotAuthenticated.into();
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
