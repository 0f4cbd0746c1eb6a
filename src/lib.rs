// ==========================================
// Reagent Inventory - Core library
// ==========================================
// Hazardous reagent inventory: reagents, responsible professors,
// storage locations, bulk CSV import and filtered views.
// Stack: Rust + SQLite (JSON document collections)
// ==========================================

rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// Modules
// ==========================================

// Domain layer - entities and value types
pub mod domain;

// Engine layer - normalization, parsing, query rules
pub mod engine;

// Import layer - CSV tokenizer, mapping, batch write, export
pub mod importer;

// Repository layer - document store boundary
pub mod repository;

// Auth boundary
pub mod auth;

// Configuration
pub mod config;

// Database infrastructure (connection setup / PRAGMA / schema)
pub mod db;

// Logging
pub mod logging;

// i18n
pub mod i18n;

// API layer
pub mod api;

// Application wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    Location, Professor, ProfessorPosition, Quantity, QuantityUnit, Reagent, SessionContext,
    SessionUser, StoredDocument,
};

pub use engine::{ReagentColumn, ReagentQuery, ReferenceIndex, SortDirection};

pub use importer::{ImportError, ImportSummary, ReagentImporter, ReagentImporterImpl};

pub use api::{ApiError, ApiResult, AuthApi, LocationApi, ProfessorApi, ReagentApi};

pub use app::AppState;

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Inventario de Reactivos";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_locales_loaded() {
        assert_eq!(i18n::t_in("es", "column.name"), "Nombre");
    }
}
