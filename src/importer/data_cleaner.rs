// ==========================================
// Reagent Inventory - Data cleaner
// ==========================================
// Mapped text → typed reagent fields
// Lenient throughout: bad dates pass through, bad quantities empty out,
// unresolved references become unassigned.
// ==========================================

use crate::domain::{Quantity, QuantityUnit, Reagent};
use crate::engine::{normalize_date_text, parse_quantity, ReferenceIndex};
use crate::importer::field_mapper::{MappedRow, QuantitySource};

#[derive(Debug, Default, Clone, Copy)]
pub struct DataCleaner;

impl DataCleaner {
    pub fn new() -> Self {
        Self
    }

    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// `YYYY-MM-DD` when the text is a recognisable date, verbatim otherwise.
    pub fn clean_date(&self, value: &str) -> String {
        normalize_date_text(value)
    }

    /// Structured columns: the value cell is parsed like free text, and a
    /// non-empty unit cell overrides any unit found inside it.
    pub fn clean_quantity(&self, source: &QuantitySource) -> Quantity {
        match source {
            QuantitySource::Structured { value, unit } => {
                let parsed = parse_quantity(value);
                let unit = match unit.trim() {
                    "" => parsed.unit,
                    token => QuantityUnit::from_token(token),
                };
                Quantity::new(parsed.value, unit)
            }
            QuantitySource::Legacy(text) => parse_quantity(text),
            QuantitySource::Absent => Quantity::empty(),
        }
    }

    /// Builds the reagent to write, or `None` for a row without a name.
    pub fn build_reagent(&self, row: &MappedRow, refs: &ReferenceIndex<'_>) -> Option<Reagent> {
        let name = self.clean_text(&row.name);
        if name.is_empty() {
            return None;
        }

        let mut reagent = Reagent {
            name,
            brand: self.clean_text(&row.brand),
            class: self.clean_text(&row.class),
            cabinet: self.clean_text(&row.cabinet),
            code: self.clean_text(&row.code),
            safety_sheet_url: self.clean_text(&row.safety_sheet_url),
            expiration_date: self.clean_date(&row.expiration_date),
            professor_id: refs.resolve_professor_id(row.professor_ref.trim()),
            location_id: refs.resolve_location_id(row.location_ref.trim()),
            ..Default::default()
        };
        reagent.set_quantity(self.clean_quantity(&row.quantity));
        Some(reagent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, Professor, StoredDocument};

    fn mapped(name: &str) -> MappedRow {
        MappedRow {
            row_number: 1,
            name: name.to_string(),
            professor_ref: String::new(),
            location_ref: String::new(),
            brand: String::new(),
            class: String::new(),
            cabinet: String::new(),
            code: String::new(),
            safety_sheet_url: String::new(),
            expiration_date: String::new(),
            quantity: QuantitySource::Absent,
        }
    }

    #[test]
    fn test_row_without_name_is_skipped() {
        let cleaner = DataCleaner::new();
        assert!(cleaner.build_reagent(&mapped("   "), &ReferenceIndex::empty()).is_none());
    }

    #[test]
    fn test_references_resolved_by_name_or_left_unassigned() {
        let professors = vec![StoredDocument::new("p1", Professor::new("Ana", "Pérez", "ana@x.org"))];
        let locations = vec![StoredDocument::new("l1", Location::new("204"))];
        let refs = ReferenceIndex::new(&professors, &locations);

        let mut row = mapped("Acetona");
        row.professor_ref = "ana pérez".to_string();
        row.location_ref = "999".to_string();
        let reagent = DataCleaner::new().build_reagent(&row, &refs).unwrap();
        assert_eq!(reagent.professor_id, "p1");
        assert_eq!(reagent.location_id, "");
    }

    #[test]
    fn test_dates_normalized_or_passed_through() {
        let cleaner = DataCleaner::new();
        assert_eq!(cleaner.clean_date("2025/03/01"), "2025-03-01");
        assert_eq!(cleaner.clean_date("31/12/2026"), "2026-12-31");
        assert_eq!(cleaner.clean_date("pronto"), "pronto");
    }

    #[test]
    fn test_structured_quantity() {
        let cleaner = DataCleaner::new();
        let q = cleaner.clean_quantity(&QuantitySource::Structured {
            value: "2,5".to_string(),
            unit: "ml".to_string(),
        });
        assert_eq!(q.value, Some(2.5));
        assert_eq!(q.unit, Some(QuantityUnit::Milliliter));

        let q = cleaner.clean_quantity(&QuantitySource::Structured {
            value: String::new(),
            unit: "L".to_string(),
        });
        assert!(q.is_empty());
        assert_eq!(q.unit, None);
    }

    #[test]
    fn test_legacy_quantity() {
        let q = DataCleaner::new().clean_quantity(&QuantitySource::Legacy("3 KG".to_string()));
        assert_eq!(q.value, Some(3.0));
        assert_eq!(q.unit, Some(QuantityUnit::Kilogram));
    }
}
