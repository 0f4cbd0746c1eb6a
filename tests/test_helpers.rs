// ==========================================
// Test helpers
// ==========================================
// Temp database, wired AppState, signed-in session, seed data
// ==========================================

#![allow(dead_code)]

use reagent_inventory::app::AppState;
use reagent_inventory::db::{init_schema, open_sqlite_connection};
use reagent_inventory::{Location, Professor, SessionContext};
use std::error::Error;
use tempfile::NamedTempFile;

/// Temp database file with the schema applied.
///
/// # Returns
/// - NamedTempFile: keep alive for the duration of the test
/// - String: database path
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("temp path is not UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// AppState over a fresh temp database.
pub fn create_test_state() -> (NamedTempFile, AppState) {
    let (temp_file, db_path) = create_test_db().expect("create test db");
    let state = AppState::new(db_path).expect("create app state");
    (temp_file, state)
}

/// Registers a throwaway account and returns its session.
pub async fn signed_in(state: &AppState) -> SessionContext {
    state
        .auth_api
        .sign_up("docente@lab.test", "secreto", Some("Docente"))
        .await
        .expect("sign up");
    state.auth_api.session()
}

pub struct SeedIds {
    pub professor_id: String,
    pub location_id: String,
    pub other_location_id: String,
}

/// One professor (Ana Pérez) and two locations ("204", "Depósito").
pub async fn seed_references(state: &AppState, ctx: &SessionContext) -> SeedIds {
    let professor_id = state
        .professor_api
        .create_professor(ctx, &Professor::new("Ana", "Pérez", "ana@lab.test"))
        .await
        .expect("create professor");
    let location_id = state
        .location_api
        .create_location(ctx, &Location::new("204"))
        .await
        .expect("create location");
    let other_location_id = state
        .location_api
        .create_location(ctx, &Location::new("Depósito"))
        .await
        .expect("create location");

    SeedIds {
        professor_id,
        location_id,
        other_location_id,
    }
}
