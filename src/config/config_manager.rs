// ==========================================
// Reagent Inventory - Config manager
// ==========================================
// Storage: config_kv table (scope_id = 'global')
// Missing keys fall back to defaults; malformed values log and fall back.
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    /// Explicit CSV delimiter; unset means auto-detect
    pub const IMPORT_CSV_DELIMITER: &str = "import.csv_delimiter";
    /// UI label locale (`es` / `en`)
    pub const UI_LOCALE: &str = "ui.locale";
    /// Whether email/password sign-up is offered
    pub const AUTH_ALLOW_SIGN_UP: &str = "auth.allow_sign_up";
}

pub const DEFAULT_LOCALE: &str = "es";

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Opens the database at `db_path` and makes sure the schema exists.
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Shares an existing connection; PRAGMAs are re-applied (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
            ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        tracing::info!(key, value, "config updated");
        Ok(())
    }

    pub fn remove_global_config_value(&self, key: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Every global key as a JSON object string.
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(serde_json::to_string(&config_map)?)
    }

    /// Upserts every key of a snapshot in one transaction. Returns the count.
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;
        for (key, value) in &config_map {
            count += tx.execute(
                r#"
                INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')
                "#,
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(count)
    }

    // ===== Typed getters =====

    pub fn get_locale(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::UI_LOCALE, DEFAULT_LOCALE)?;
        match value.trim() {
            "es" | "en" => Ok(value.trim().to_string()),
            other => {
                tracing::warn!(config_key = config_keys::UI_LOCALE, raw_value = %other, "unsupported locale, using default");
                Ok(DEFAULT_LOCALE.to_string())
            }
        }
    }

    pub fn get_allow_sign_up(&self) -> ConfigResult<bool> {
        let value = self.get_config_or_default(config_keys::AUTH_ALLOW_SIGN_UP, "true")?;
        Ok(parse_bool(&value).unwrap_or_else(|| {
            tracing::warn!(config_key = config_keys::AUTH_ALLOW_SIGN_UP, raw_value = %value, "malformed flag, using true");
            true
        }))
    }

    /// Stores an explicit delimiter, or clears it with `None`.
    pub fn set_csv_delimiter(&self, delimiter: Option<char>) -> ConfigResult<()> {
        match delimiter {
            Some(c) => self.set_global_config_value(config_keys::IMPORT_CSV_DELIMITER, &c.to_string()),
            None => self.remove_global_config_value(config_keys::IMPORT_CSV_DELIMITER),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "si" | "sí" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// `","`, `";"`, `"\t"` (escaped or literal) → the delimiter char.
fn parse_delimiter(value: &str) -> Option<char> {
    if value == "\\t" || value == "\t" {
        return Some('\t');
    }
    let mut chars = value.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '"' => Some(c),
        _ => None,
    }
}

// ==========================================
// ImportConfigReader impl
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_csv_delimiter(&self) -> ConfigResult<Option<char>> {
        let value = match self.get_global_config_value(config_keys::IMPORT_CSV_DELIMITER)? {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(None),
        };
        match parse_delimiter(&value) {
            Some(c) => Ok(Some(c)),
            None => Err(ConfigError::InvalidValue {
                key: config_keys::IMPORT_CSV_DELIMITER.to_string(),
                value,
                message: "expected a single non-quote character".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = manager();
        assert_eq!(config.get_locale().unwrap(), "es");
        assert!(config.get_allow_sign_up().unwrap());
    }

    #[test]
    fn test_set_and_read_back() {
        let config = manager();
        config.set_global_config_value(config_keys::UI_LOCALE, "en").unwrap();
        config.set_global_config_value(config_keys::AUTH_ALLOW_SIGN_UP, "false").unwrap();
        assert_eq!(config.get_locale().unwrap(), "en");
        assert!(!config.get_allow_sign_up().unwrap());

        config.set_global_config_value(config_keys::UI_LOCALE, "fr").unwrap();
        assert_eq!(config.get_locale().unwrap(), "es");
    }

    #[tokio::test]
    async fn test_csv_delimiter() {
        let config = manager();
        assert_eq!(config.get_csv_delimiter().await.unwrap(), None);

        config.set_csv_delimiter(Some(';')).unwrap();
        assert_eq!(config.get_csv_delimiter().await.unwrap(), Some(';'));

        config.set_global_config_value(config_keys::IMPORT_CSV_DELIMITER, "\\t").unwrap();
        assert_eq!(config.get_csv_delimiter().await.unwrap(), Some('\t'));

        config.set_global_config_value(config_keys::IMPORT_CSV_DELIMITER, ";;").unwrap();
        assert!(config.get_csv_delimiter().await.is_err());

        config.set_csv_delimiter(None).unwrap();
        assert_eq!(config.get_csv_delimiter().await.unwrap(), None);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let config = manager();
        config.set_global_config_value(config_keys::UI_LOCALE, "en").unwrap();
        let snapshot = config.get_config_snapshot().unwrap();

        let other = manager();
        assert_eq!(other.restore_config_from_snapshot(&snapshot).unwrap(), 1);
        assert_eq!(other.get_locale().unwrap(), "en");
    }
}
