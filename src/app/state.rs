// ==========================================
// Reagent Inventory - Application state
// ==========================================
// Wires one shared SQLite connection into the store, config,
// auth provider and the API façades.
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{ApiError, ApiResult, AuthApi, LocationApi, ProfessorApi, ReagentApi};
use crate::auth::{AuthProvider, LocalAuthProvider};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::{ReagentImporter, ReagentImporterImpl};
use crate::repository::{
    DocumentStore, LocationRepository, ProfessorRepository, ReagentRepository, SqliteDocumentStore,
};

pub use crate::config::get_default_db_path;

pub struct AppState {
    pub db_path: String,
    pub config: Arc<ConfigManager>,
    pub store: Arc<dyn DocumentStore>,
    pub reagent_api: Arc<ReagentApi>,
    pub professor_api: Arc<ProfessorApi>,
    pub location_api: Arc<LocationApi>,
    pub auth_api: Arc<AuthApi>,
}

impl AppState {
    /// Opens (creating if needed) the database at `db_path` and builds every layer.
    pub fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!(db_path = %db_path, "initializing app state");

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(format!("cannot open {}: {}", db_path, e)))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let mut state = Self::from_connection(Arc::new(Mutex::new(conn)))?;
        state.db_path = db_path;
        Ok(state)
    }

    /// In-memory database, for tests and dry runs.
    pub fn in_memory() -> ApiResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        // ===== Config =====
        let config = Arc::new(ConfigManager::from_connection(Arc::clone(&conn))?);
        crate::i18n::set_locale(&config.get_locale()?);

        // ===== Repositories =====
        let store: Arc<dyn DocumentStore> =
            Arc::new(SqliteDocumentStore::from_connection(Arc::clone(&conn)));
        let reagent_repo = ReagentRepository::new(Arc::clone(&store));
        let professor_repo = ProfessorRepository::new(Arc::clone(&store));
        let location_repo = LocationRepository::new(Arc::clone(&store));

        // ===== Import / auth =====
        let importer: Arc<dyn ReagentImporter> = Arc::new(ReagentImporterImpl::new(
            reagent_repo.clone(),
            Arc::clone(&config),
        ));
        let auth_provider: Arc<dyn AuthProvider> =
            Arc::new(LocalAuthProvider::from_connection(Arc::clone(&conn)));

        // ===== APIs =====
        let reagent_api = Arc::new(ReagentApi::new(
            reagent_repo,
            professor_repo.clone(),
            location_repo.clone(),
            importer,
        ));
        let professor_api = Arc::new(ProfessorApi::new(professor_repo));
        let location_api = Arc::new(LocationApi::new(location_repo));
        let auth_api = Arc::new(AuthApi::new(auth_provider, Arc::clone(&config)));

        tracing::info!("app state ready");
        Ok(Self {
            db_path: ":memory:".to_string(),
            config,
            store,
            reagent_api,
            professor_api,
            location_api,
            auth_api,
        })
    }
}
