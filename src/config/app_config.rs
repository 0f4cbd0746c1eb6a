// ==========================================
// Reagent Inventory - Process-level config
// ==========================================
// Resolved once at startup from the environment, before the
// database (and therefore config_kv) is available.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use std::path::PathBuf;

/// Explicit database path (useful for tests/CI)
pub const DB_PATH_ENV: &str = "REAGENT_INVENTORY_DB";

const APP_DIR_NAME: &str = "reagent-inventory";
const DB_FILE_NAME: &str = "inventory.db";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: String,
}

impl AppConfig {
    /// `REAGENT_INVENTORY_DB`, else `<data_dir>/reagent-inventory/inventory.db`.
    /// The parent directory is created when missing.
    pub fn from_env() -> ConfigResult<Self> {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(Self {
                    db_path: trimmed.to_string(),
                });
            }
        }

        let dir = dirs::data_dir()
            .ok_or(ConfigError::NoDataDir)?
            .join(APP_DIR_NAME);
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            db_path: path_string(dir.join(DB_FILE_NAME)),
        })
    }

    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

/// Database path for the running process; falls back to the working
/// directory when no data directory can be resolved.
pub fn get_default_db_path() -> String {
    match AppConfig::from_env() {
        Ok(config) => config.db_path,
        Err(e) => {
            tracing::warn!(error = %e, "falling back to ./{}", DB_FILE_NAME);
            format!("./{}", DB_FILE_NAME)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_db_path() {
        assert_eq!(AppConfig::with_db_path("/tmp/x.db").db_path, "/tmp/x.db");
    }
}
