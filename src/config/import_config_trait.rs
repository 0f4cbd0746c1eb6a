// ==========================================
// Reagent Inventory - Import config reader
// ==========================================
// Read-only view of the settings the import pipeline needs
// Implemented by: ConfigManager (config_kv table)
// ==========================================

use crate::config::error::ConfigResult;
use async_trait::async_trait;

#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Explicit CSV delimiter.
    ///
    /// # Returns
    /// - `None`: detect from the header line
    ///
    /// # Default
    /// - `None`
    async fn get_csv_delimiter(&self) -> ConfigResult<Option<char>>;
}

#[async_trait]
impl<T> ImportConfigReader for std::sync::Arc<T>
where
    T: ImportConfigReader + ?Sized,
{
    async fn get_csv_delimiter(&self) -> ConfigResult<Option<char>> {
        (**self).get_csv_delimiter().await
    }
}
