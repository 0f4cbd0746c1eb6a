// ==========================================
// Reagent Inventory - Import error types
// ==========================================
// Tooling: thiserror
// Row-level problems never surface here: they are skipped.
// Only whole-import outcomes are errors.
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Input =====
    #[error("CSV input is empty")]
    EmptyInput,

    #[error("CSV has no data rows")]
    NoRows,

    #[error("no valid rows to import ({total_rows} rows, none with a name)")]
    NoValidRows { total_rows: usize },

    #[error("file read failed: {0}")]
    FileReadError(String),

    // ===== Output =====
    #[error("CSV write failed: {0}")]
    CsvWriteError(String),

    // ===== Store =====
    #[error("batch write failed: {0}")]
    Store(#[from] RepositoryError),

    // ===== Config =====
    #[error("config read failed (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== Generic =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvWriteError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
