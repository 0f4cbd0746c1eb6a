// ==========================================
// Reagent Inventory - Config layer
// ==========================================
// Process config from the environment, runtime settings in config_kv
// ==========================================

pub mod app_config;
pub mod config_manager;
pub mod error;
pub mod import_config_trait;

pub use app_config::{get_default_db_path, AppConfig, DB_PATH_ENV};
pub use config_manager::{config_keys, ConfigManager, DEFAULT_LOCALE};
pub use error::{ConfigError, ConfigResult};
pub use import_config_trait::ImportConfigReader;
