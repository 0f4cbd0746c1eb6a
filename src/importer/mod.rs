// ==========================================
// Reagent Inventory - Import layer
// ==========================================
// CSV text → reagent records, and reagent views → CSV
// ==========================================

pub mod csv_export;
pub mod csv_tokenizer;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod reagent_importer;

pub use csv_export::{reagents_to_csv, write_reagents_csv, EXPORT_HEADERS};
pub use csv_tokenizer::{detect_delimiter, parse_csv, tokenize_line, unquote, CsvRow};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, MappedRow, QuantitySource};
pub use reagent_importer::{
    prepare_batch, ImportSummary, PreparedBatch, ReagentImporter, ReagentImporterImpl,
};
