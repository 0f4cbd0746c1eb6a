// ==========================================
// Reagent Inventory - Reagent API
// ==========================================
// Cached full list + filtered/sorted views
// Writes need a signed-in session and invalidate the cache
// ==========================================

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::api::require_session;
use crate::domain::{LocationDoc, ProfessorDoc, Reagent, ReagentDoc, SessionContext};
use crate::engine::{sort_reagents, ReagentColumn, ReagentQuery, ReferenceIndex, SortDirection};
use crate::i18n::t;
use crate::importer::{reagents_to_csv, DataCleaner, ImportSummary, QuantitySource, ReagentImporter};
use crate::repository::{LocationRepository, ProfessorRepository, ReagentRepository};

// ==========================================
// ReagentForm - create/edit payload
// ==========================================
/// Form fields as typed by the user. Saved with the same cleanup as
/// the import path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReagentForm {
    pub name: String,
    pub brand: String,
    pub class: String,
    pub cabinet: String,
    pub code: String,
    pub safety_sheet_url: String,
    pub expiration_date: String,
    pub professor_id: String,
    pub location_id: String,
    pub quantity_value: String,
    pub quantity_unit: String,
}

impl ReagentForm {
    /// Pre-filled form for editing.
    pub fn from_reagent(reagent: &Reagent) -> Self {
        let quantity = reagent.quantity();
        Self {
            name: reagent.name.clone(),
            brand: reagent.brand.clone(),
            class: reagent.class.clone(),
            cabinet: reagent.cabinet.clone(),
            code: reagent.code.clone(),
            safety_sheet_url: reagent.safety_sheet_url.clone(),
            expiration_date: reagent.expiration_date.clone(),
            professor_id: reagent.professor_id.clone(),
            location_id: reagent.location_id.clone(),
            quantity_value: quantity
                .value
                .map(crate::engine::format_value)
                .or_else(|| reagent.legacy_quantity.clone())
                .unwrap_or_default(),
            quantity_unit: quantity.unit_str().to_string(),
        }
    }

    /// Cleaned record; fails only when the name is blank.
    pub fn into_reagent(self) -> ApiResult<Reagent> {
        let cleaner = DataCleaner::new();
        let name = cleaner.clean_text(&self.name);
        if name.is_empty() {
            return Err(ApiError::InvalidInput(t("reagent.name_required")));
        }

        let mut reagent = Reagent {
            name,
            brand: cleaner.clean_text(&self.brand),
            class: cleaner.clean_text(&self.class),
            cabinet: cleaner.clean_text(&self.cabinet),
            code: cleaner.clean_text(&self.code),
            safety_sheet_url: cleaner.clean_text(&self.safety_sheet_url),
            expiration_date: cleaner.clean_date(&self.expiration_date),
            professor_id: cleaner.clean_text(&self.professor_id),
            location_id: cleaner.clean_text(&self.location_id),
            ..Default::default()
        };
        reagent.set_quantity(cleaner.clean_quantity(&QuantitySource::Structured {
            value: self.quantity_value,
            unit: self.quantity_unit,
        }));
        Ok(reagent)
    }
}

// ==========================================
// ReagentRow / ReagentView - table output
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReagentRow {
    pub id: String,
    /// Cell text in `ReagentColumn::ALL` order
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub column: ReagentColumn,
    pub title: String,
    pub sortable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReagentView {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<ReagentRow>,
    /// Name of the active location filter, if any
    pub location_chip: Option<String>,
    pub total: usize,
}

/// Column catalogue in table order.
pub fn column_catalogue() -> Vec<ColumnInfo> {
    ReagentColumn::ALL
        .iter()
        .map(|c| ColumnInfo {
            column: *c,
            title: c.title(),
            sortable: c.is_sortable(),
        })
        .collect()
}

// ==========================================
// ReagentApi
// ==========================================
pub struct ReagentApi {
    reagent_repo: ReagentRepository,
    professor_repo: ProfessorRepository,
    location_repo: LocationRepository,
    importer: Arc<dyn ReagentImporter>,
    cache: Mutex<Option<Arc<Vec<ReagentDoc>>>>,
}

impl ReagentApi {
    pub fn new(
        reagent_repo: ReagentRepository,
        professor_repo: ProfessorRepository,
        location_repo: LocationRepository,
        importer: Arc<dyn ReagentImporter>,
    ) -> Self {
        Self {
            reagent_repo,
            professor_repo,
            location_repo,
            importer,
            cache: Mutex::new(None),
        }
    }

    // ===== Cache =====

    fn cached(&self) -> ApiResult<Option<Arc<Vec<ReagentDoc>>>> {
        let guard = self
            .cache
            .lock()
            .map_err(|e| ApiError::InternalError(format!("cache lock poisoned: {}", e)))?;
        Ok(guard.clone())
    }

    fn store_cache(&self, value: Option<Arc<Vec<ReagentDoc>>>) -> ApiResult<()> {
        let mut guard = self
            .cache
            .lock()
            .map_err(|e| ApiError::InternalError(format!("cache lock poisoned: {}", e)))?;
        *guard = value;
        Ok(())
    }

    pub fn invalidate_cache(&self) -> ApiResult<()> {
        debug!("reagent cache invalidated");
        self.store_cache(None)
    }

    pub fn is_cached(&self) -> bool {
        matches!(self.cached(), Ok(Some(_)))
    }

    /// Full reagent list, fetched once and reused until a write.
    pub async fn list_reagents(&self) -> ApiResult<Arc<Vec<ReagentDoc>>> {
        if let Some(list) = self.cached()? {
            return Ok(list);
        }
        self.refresh().await
    }

    /// Re-fetches the full list regardless of the cache.
    pub async fn refresh(&self) -> ApiResult<Arc<Vec<ReagentDoc>>> {
        let list = Arc::new(self.reagent_repo.list().await?);
        debug!(count = list.len(), "reagent list fetched");
        self.store_cache(Some(Arc::clone(&list)))?;
        Ok(list)
    }

    async fn reference_sets(&self) -> ApiResult<(Vec<ProfessorDoc>, Vec<LocationDoc>)> {
        let (professors, locations) =
            futures::try_join!(self.professor_repo.list(), self.location_repo.list())?;
        Ok((professors, locations))
    }

    // ===== Reads =====

    pub async fn get_reagent(&self, id: &str) -> ApiResult<ReagentDoc> {
        self.reagent_repo
            .get(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("reagents/{}", id)))
    }

    /// Store-side lookup of one location's reagents.
    pub async fn list_by_location(&self, location_id: &str) -> ApiResult<Vec<ReagentDoc>> {
        Ok(self.reagent_repo.list_by_location(location_id).await?)
    }

    /// Filtered records, optionally sorted by one column.
    pub async fn query(
        &self,
        query: &ReagentQuery,
        sort: Option<(ReagentColumn, SortDirection)>,
    ) -> ApiResult<Vec<ReagentDoc>> {
        let records = self.list_reagents().await?;
        let (professors, locations) = self.reference_sets().await?;
        let refs = ReferenceIndex::new(&professors, &locations);

        let mut filtered = query.apply(&records, &refs);
        if let Some((column, direction)) = sort {
            sort_reagents(&mut filtered, column, direction, &refs);
        }
        Ok(filtered)
    }

    /// Table view: filtered, sorted, rendered to display text.
    pub async fn view(
        &self,
        query: &ReagentQuery,
        sort: Option<(ReagentColumn, SortDirection)>,
    ) -> ApiResult<ReagentView> {
        let records = self.list_reagents().await?;
        let (professors, locations) = self.reference_sets().await?;
        let refs = ReferenceIndex::new(&professors, &locations);

        let mut filtered = query.apply(&records, &refs);
        if let Some((column, direction)) = sort {
            sort_reagents(&mut filtered, column, direction, &refs);
        }

        let rows = filtered
            .iter()
            .map(|doc| ReagentRow {
                id: doc.id.clone(),
                cells: ReagentColumn::ALL
                    .iter()
                    .map(|c| c.display(doc, &refs))
                    .collect(),
            })
            .collect();

        Ok(ReagentView {
            columns: column_catalogue(),
            rows,
            location_chip: query.location_label(&refs),
            total: records.len(),
        })
    }

    /// Filtered view as re-importable CSV.
    pub async fn export_csv(&self, query: &ReagentQuery) -> ApiResult<String> {
        let filtered = self.query(query, None).await?;
        let (professors, locations) = self.reference_sets().await?;
        let refs = ReferenceIndex::new(&professors, &locations);
        let csv = reagents_to_csv(&filtered, &refs)?;
        info!(rows = filtered.len(), "reagents exported");
        Ok(csv)
    }

    // ===== Writes =====

    #[instrument(skip(self, ctx, form))]
    pub async fn create_reagent(&self, ctx: &SessionContext, form: ReagentForm) -> ApiResult<String> {
        let user = require_session(ctx)?;
        let reagent = form.into_reagent()?;
        let id = self.reagent_repo.create(&reagent).await?;
        info!(collection = "reagents", id = %id, uid = %user.uid, "reagent created");
        self.invalidate_cache()?;
        Ok(id)
    }

    #[instrument(skip(self, ctx, form))]
    pub async fn update_reagent(
        &self,
        ctx: &SessionContext,
        id: &str,
        form: ReagentForm,
    ) -> ApiResult<()> {
        let user = require_session(ctx)?;
        let reagent = form.into_reagent()?;
        self.reagent_repo.update(id, &reagent).await?;
        info!(collection = "reagents", id = %id, uid = %user.uid, "reagent updated");
        self.invalidate_cache()
    }

    #[instrument(skip(self, ctx))]
    pub async fn delete_reagent(&self, ctx: &SessionContext, id: &str) -> ApiResult<()> {
        let user = require_session(ctx)?;
        self.reagent_repo.delete(id).await?;
        info!(collection = "reagents", id = %id, uid = %user.uid, "reagent deleted");
        self.invalidate_cache()
    }

    /// Batch import of CSV text. All rows are written or none.
    pub async fn import_csv(&self, ctx: &SessionContext, csv_text: &str) -> ApiResult<ImportSummary> {
        require_session(ctx)?;
        let (professors, locations) = self.reference_sets().await?;
        let summary = self
            .importer
            .import_batch(csv_text, &professors, &locations)
            .await?;
        self.invalidate_cache()?;
        Ok(summary)
    }

    pub async fn import_file(&self, ctx: &SessionContext, path: &Path) -> ApiResult<ImportSummary> {
        require_session(ctx)?;
        let (professors, locations) = self.reference_sets().await?;
        let summary = self
            .importer
            .import_from_file(path, &professors, &locations)
            .await?;
        self.invalidate_cache()?;
        Ok(summary)
    }
}
