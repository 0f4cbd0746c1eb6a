// ==========================================
// Reagent Inventory - Batch reagent import
// ==========================================
// Flow: tokenize → map → clean/resolve → one atomic batch write
// Row problems are skipped and counted; only whole-import
// outcomes (no rows, no valid rows, write failure) are errors.
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{LocationDoc, ProfessorDoc, Reagent};
use crate::engine::ReferenceIndex;
use crate::i18n::t_with_args;
use crate::importer::csv_tokenizer::parse_csv;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::repository::ReagentRepository;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ImportSummary
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub batch_id: String,
    /// Non-blank data rows in the input
    pub total_rows: usize,
    pub imported: usize,
    /// Rows without a name
    pub skipped: usize,
    /// Ids assigned by the store, in row order
    pub ids: Vec<String>,
}

impl ImportSummary {
    /// "Importación completada: N reactivos"
    pub fn message(&self) -> String {
        t_with_args("import.completed", &[("count", &self.imported.to_string())])
    }
}

/// Rows ready to write, plus what was dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBatch {
    pub reagents: Vec<Reagent>,
    pub total_rows: usize,
    pub skipped_rows: Vec<usize>,
}

/// Parses and resolves a CSV without touching the store.
///
/// # Errors
/// - `EmptyInput`: blank text
/// - `NoRows`: header only
/// - `NoValidRows`: no row carries a name
pub fn prepare_batch(
    csv_text: &str,
    delimiter: Option<char>,
    refs: &ReferenceIndex<'_>,
) -> ImportResult<PreparedBatch> {
    if csv_text.trim().is_empty() {
        return Err(ImportError::EmptyInput);
    }

    let rows = parse_csv(csv_text, delimiter);
    if rows.is_empty() {
        return Err(ImportError::NoRows);
    }

    let mapper = FieldMapper::new();
    let cleaner = DataCleaner::new();
    let mut reagents = Vec::with_capacity(rows.len());
    let mut skipped_rows = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let mapped = mapper.map_row(row, idx + 1);
        match cleaner.build_reagent(&mapped, refs) {
            Some(reagent) => reagents.push(reagent),
            None => {
                debug!(row_number = mapped.row_number, "row without name skipped");
                skipped_rows.push(mapped.row_number);
            }
        }
    }

    if reagents.is_empty() {
        return Err(ImportError::NoValidRows {
            total_rows: rows.len(),
        });
    }

    Ok(PreparedBatch {
        reagents,
        total_rows: rows.len(),
        skipped_rows,
    })
}

// ==========================================
// ReagentImporter trait
// ==========================================
#[async_trait]
pub trait ReagentImporter: Send + Sync {
    /// Imports CSV text against the current professor/location sets.
    ///
    /// # Returns
    /// - Ok(ImportSummary): every valid row was written
    /// - Err: nothing was written
    async fn import_batch(
        &self,
        csv_text: &str,
        professors: &[ProfessorDoc],
        locations: &[LocationDoc],
    ) -> ImportResult<ImportSummary>;

    /// Reads a UTF-8 file and imports it.
    async fn import_from_file(
        &self,
        path: &Path,
        professors: &[ProfessorDoc],
        locations: &[LocationDoc],
    ) -> ImportResult<ImportSummary>;
}

// ==========================================
// ReagentImporterImpl
// ==========================================
pub struct ReagentImporterImpl<C>
where
    C: ImportConfigReader,
{
    reagent_repo: ReagentRepository,
    config: C,
}

impl<C> ReagentImporterImpl<C>
where
    C: ImportConfigReader,
{
    pub fn new(reagent_repo: ReagentRepository, config: C) -> Self {
        Self {
            reagent_repo,
            config,
        }
    }

    async fn resolve_delimiter(&self) -> ImportResult<Option<char>> {
        self.config
            .get_csv_delimiter()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: crate::config::config_keys::IMPORT_CSV_DELIMITER.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl<C> ReagentImporter for ReagentImporterImpl<C>
where
    C: ImportConfigReader,
{
    #[instrument(skip_all, fields(batch_id))]
    async fn import_batch(
        &self,
        csv_text: &str,
        professors: &[ProfessorDoc],
        locations: &[LocationDoc],
    ) -> ImportResult<ImportSummary> {
        let batch_id = Uuid::new_v4().simple().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(bytes = csv_text.len(), "starting reagent import");

        // === Step 1: delimiter ===
        let delimiter = self.resolve_delimiter().await?;
        debug!(?delimiter, "delimiter resolved");

        // === Step 2: parse, map, resolve ===
        let refs = ReferenceIndex::new(professors, locations);
        let batch = prepare_batch(csv_text, delimiter, &refs).map_err(|e| {
            warn!(error = %e, "import rejected");
            e
        })?;
        info!(
            rows = batch.total_rows,
            valid = batch.reagents.len(),
            skipped = batch.skipped_rows.len(),
            "rows prepared"
        );

        // === Step 3: atomic write ===
        let ids = self
            .reagent_repo
            .batch_create(&batch.reagents)
            .await
            .map_err(|e| {
                error!(error = %e, "batch write failed, nothing imported");
                ImportError::Store(e)
            })?;

        let summary = ImportSummary {
            batch_id,
            total_rows: batch.total_rows,
            imported: ids.len(),
            skipped: batch.skipped_rows.len(),
            ids,
        };
        info!(imported = summary.imported, skipped = summary.skipped, "import completed");
        Ok(summary)
    }

    async fn import_from_file(
        &self,
        path: &Path,
        professors: &[ProfessorDoc],
        locations: &[LocationDoc],
    ) -> ImportResult<ImportSummary> {
        info!(file = %path.display(), "reading import file");
        let text = tokio::fs::read_to_string(path).await?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
        self.import_batch(text, professors, locations).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, StoredDocument};

    #[test]
    fn test_prepare_counts_skipped_rows() {
        let csv = "nombre,marca\nAcetona,Merck\n,Anedra\nEtanol,\n";
        let batch = prepare_batch(csv, None, &ReferenceIndex::empty()).unwrap();
        assert_eq!(batch.total_rows, 3);
        assert_eq!(batch.reagents.len(), 2);
        assert_eq!(batch.skipped_rows, vec![2]);
        assert_eq!(batch.reagents[0].brand, "Merck");
    }

    #[test]
    fn test_prepare_errors() {
        let refs = ReferenceIndex::empty();
        assert!(matches!(prepare_batch("  \n", None, &refs), Err(ImportError::EmptyInput)));
        assert!(matches!(prepare_batch("nombre,lugar\n", None, &refs), Err(ImportError::NoRows)));
        assert!(matches!(
            prepare_batch("nombre,lugar\n,204\n", None, &refs),
            Err(ImportError::NoValidRows { total_rows: 1 })
        ));
    }

    #[test]
    fn test_prepare_resolves_location_by_name() {
        let locations = vec![StoredDocument::new("loc-9", Location::new("204"))];
        let refs = ReferenceIndex::new(&[], &locations);
        let batch = prepare_batch("nombre,lugar\nAcetona,204\n", None, &refs).unwrap();
        assert_eq!(batch.reagents[0].location_id, "loc-9");
        assert_eq!(batch.reagents[0].name, "Acetona");
    }

    #[test]
    fn test_prepare_semicolon_file_with_quantity_and_date() {
        let csv = "nombre;cantidadAlmacenada;fechaDeVencimiento\nÁcido nítrico;1,25 L;2026/01/15\n";
        let batch = prepare_batch(csv, None, &ReferenceIndex::empty()).unwrap();
        let reagent = &batch.reagents[0];
        assert_eq!(reagent.quantity_value, Some(1.25));
        assert_eq!(reagent.quantity_unit, Some(crate::domain::QuantityUnit::Liter));
        assert_eq!(reagent.expiration_date, "2026-01-15");
        assert_eq!(reagent.legacy_quantity, None);
    }
}
