// ==========================================
// Reagent Inventory - CSV export
// ==========================================
// Writes a reagent view with the import header names, so the
// output re-imports through the same pipeline.
// References are written as display names; dangling ones as "".
// ==========================================

use crate::domain::ReagentDoc;
use crate::engine::{format_value, ReferenceIndex};
use crate::importer::error::{ImportError, ImportResult};
use std::io::Write;

pub const EXPORT_HEADERS: [&str; 11] = [
    "nombre",
    "docente",
    "lugar",
    "marca",
    "clase",
    "cantidadValor",
    "cantidadUnidad",
    "fechaDeVencimiento",
    "gabinete",
    "codigo",
    "hDes",
];

/// Line breaks would split a record for the line-oriented tokenizer.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

fn export_row(doc: &ReagentDoc, refs: &ReferenceIndex<'_>) -> [String; 11] {
    let r = &doc.record;
    let (value, unit) = match (r.quantity_value, r.quantity_unit) {
        (Some(v), unit) => (format_value(v), unit.map(|u| u.as_str().to_string()).unwrap_or_default()),
        (None, _) => (r.legacy_quantity.clone().unwrap_or_default(), String::new()),
    };

    [
        single_line(&r.name),
        single_line(&refs.professor_name(&r.professor_id)),
        single_line(&refs.location_name(&r.location_id)),
        single_line(&r.brand),
        single_line(&r.class),
        single_line(&value),
        unit,
        single_line(&r.expiration_date),
        single_line(&r.cabinet),
        single_line(&r.code),
        single_line(&r.safety_sheet_url),
    ]
}

/// Writes `records` as comma-separated CSV with a header row.
/// Returns the number of data rows written.
pub fn write_reagents_csv<W: Write>(
    writer: W,
    records: &[ReagentDoc],
    refs: &ReferenceIndex<'_>,
) -> ImportResult<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADERS)?;
    for doc in records {
        csv_writer.write_record(export_row(doc, refs))?;
    }
    csv_writer
        .flush()
        .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

    tracing::debug!(rows = records.len(), "reagent CSV written");
    Ok(records.len())
}

/// In-memory variant of [`write_reagents_csv`].
pub fn reagents_to_csv(records: &[ReagentDoc], refs: &ReferenceIndex<'_>) -> ImportResult<String> {
    let mut buffer = Vec::new();
    write_reagents_csv(&mut buffer, records, refs)?;
    String::from_utf8(buffer).map_err(|e| ImportError::CsvWriteError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, Quantity, QuantityUnit, Reagent, StoredDocument};
    use crate::importer::reagent_importer::prepare_batch;

    #[test]
    fn test_export_reimports_to_same_fields() {
        let locations = vec![StoredDocument::new("l1", Location::new("Lab, 204"))];
        let refs = ReferenceIndex::new(&[], &locations);

        let mut reagent = Reagent::new("Ácido \"fuerte\"");
        reagent.location_id = "l1".to_string();
        reagent.brand = "Merck".to_string();
        reagent.expiration_date = "2026-05-01".to_string();
        reagent.set_quantity(Quantity::new(Some(0.5), Some(QuantityUnit::Kilogram)));
        let docs = vec![StoredDocument::new("r1", reagent.clone())];

        let text = reagents_to_csv(&docs, &refs).unwrap();
        assert!(text.starts_with("nombre,docente,lugar,"));

        let batch = prepare_batch(&text, None, &refs).unwrap();
        assert_eq!(batch.reagents, vec![reagent]);
    }

    #[test]
    fn test_legacy_quantity_exported_as_text() {
        let mut reagent = Reagent::new("Viejo");
        reagent.legacy_quantity = Some("2 L".to_string());
        let docs = vec![StoredDocument::new("r1", reagent)];

        let text = reagents_to_csv(&docs, &ReferenceIndex::empty()).unwrap();
        let batch = prepare_batch(&text, None, &ReferenceIndex::empty()).unwrap();
        assert_eq!(batch.reagents[0].quantity_value, Some(2.0));
        assert_eq!(batch.reagents[0].quantity_unit, Some(QuantityUnit::Liter));
        assert_eq!(batch.reagents[0].legacy_quantity, None);
    }
}
