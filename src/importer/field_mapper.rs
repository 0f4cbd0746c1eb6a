// ==========================================
// Reagent Inventory - Field mapper
// ==========================================
// Import header → reagent field, through ordered alias chains.
// The first alias present in the row wins, even when its cell is empty.
// Headers reach this layer already lower-cased by the tokenizer.
// ==========================================

use crate::importer::csv_tokenizer::CsvRow;

// ===== Header alias chains =====
pub const NAME_HEADERS: &[&str] = &["nombre"];
pub const PROFESSOR_HEADERS: &[&str] = &["docente", "docenteid", "docente_id", "profesor", "profesorid"];
pub const LOCATION_HEADERS: &[&str] = &["lugar", "lugarid", "lugar_id", "ubicacion", "ubicación"];
pub const BRAND_HEADERS: &[&str] = &["marca"];
pub const CLASS_HEADERS: &[&str] = &["clase", "categoria", "categoría"];
pub const LEGACY_QUANTITY_HEADERS: &[&str] = &["cantidadalmacenada", "cantidad", "stock"];
pub const QUANTITY_VALUE_HEADER: &str = "cantidadvalor";
pub const QUANTITY_UNIT_HEADER: &str = "cantidadunidad";
pub const EXPIRATION_HEADERS: &[&str] = &["fechadevencimiento", "vencimiento", "fecha_vencimiento"];
pub const CABINET_HEADERS: &[&str] = &["gabinete"];
pub const CODE_HEADERS: &[&str] = &["codigo", "código"];
pub const SAFETY_SHEET_HEADERS: &[&str] = &["hdes", "hds", "hojadeseguridad", "linkhdes", "urlhdes"];

/// Where a row's quantity comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantitySource {
    /// `cantidadValor` / `cantidadUnidad` columns (either one present).
    Structured { value: String, unit: String },
    /// Single free-text column, parsed like user input.
    Legacy(String),
    Absent,
}

/// One CSV row projected onto reagent fields, still raw text.
/// References are unresolved: they may be ids or display names.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub row_number: usize,
    pub name: String,
    pub professor_ref: String,
    pub location_ref: String,
    pub brand: String,
    pub class: String,
    pub cabinet: String,
    pub code: String,
    pub safety_sheet_url: String,
    pub expiration_date: String,
    pub quantity: QuantitySource,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FieldMapper;

impl FieldMapper {
    pub fn new() -> Self {
        Self
    }

    /// Projects one row. `row_number` is 1-based over data rows.
    pub fn map_row(&self, row: &CsvRow, row_number: usize) -> MappedRow {
        MappedRow {
            row_number,
            name: self.get_string(row, NAME_HEADERS),
            professor_ref: self.get_string(row, PROFESSOR_HEADERS),
            location_ref: self.get_string(row, LOCATION_HEADERS),
            brand: self.get_string(row, BRAND_HEADERS),
            class: self.get_string(row, CLASS_HEADERS),
            cabinet: self.get_string(row, CABINET_HEADERS),
            code: self.get_string(row, CODE_HEADERS),
            safety_sheet_url: self.get_string(row, SAFETY_SHEET_HEADERS),
            expiration_date: self.get_string(row, EXPIRATION_HEADERS),
            quantity: self.quantity_source(row),
        }
    }

    /// Trimmed value of the first alias present in the row, `""` if none is.
    fn get_string(&self, row: &CsvRow, aliases: &[&str]) -> String {
        aliases
            .iter()
            .find_map(|alias| row.get(*alias))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    fn quantity_source(&self, row: &CsvRow) -> QuantitySource {
        let value = row.get(QUANTITY_VALUE_HEADER);
        let unit = row.get(QUANTITY_UNIT_HEADER);
        if value.is_some() || unit.is_some() {
            return QuantitySource::Structured {
                value: value.map(|v| v.trim().to_string()).unwrap_or_default(),
                unit: unit.map(|u| u.trim().to_string()).unwrap_or_default(),
            };
        }

        if LEGACY_QUANTITY_HEADERS.iter().any(|h| row.contains_key(*h)) {
            QuantitySource::Legacy(self.get_string(row, LEGACY_QUANTITY_HEADERS))
        } else {
            QuantitySource::Absent
        }
    }
}
