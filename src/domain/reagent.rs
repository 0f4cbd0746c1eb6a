// ==========================================
// Reagent Inventory - Reagent domain model
// ==========================================
// Collection: reagents
// Stored documents are decoded through `ReagentDocument`, which is the
// single place where missing fields, legacy Spanish field names and
// loosely-typed values get defaulted.
// ==========================================

use crate::domain::lenient;
use crate::domain::types::{unit_serde, Quantity, QuantityUnit};
use serde::{Deserialize, Serialize};

// ==========================================
// Reagent
// ==========================================
// Empty string = unassigned for `professor_id` / `location_id`
// `expiration_date` is `YYYY-MM-DD` when recognised, verbatim otherwise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ReagentDocument")]
pub struct Reagent {
    pub name: String,
    pub brand: String,
    pub class: String,
    pub cabinet: String,
    pub code: String,
    pub safety_sheet_url: String,
    pub expiration_date: String,
    pub professor_id: String,
    pub location_id: String,
    pub quantity_value: Option<f64>,
    #[serde(with = "unit_serde")]
    pub quantity_unit: Option<QuantityUnit>,
    /// Free-text quantity of records written before the structured pair existed.
    /// Read-only: new writes never populate it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_quantity: Option<String>,
}

impl Reagent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn quantity(&self) -> Quantity {
        Quantity::new(self.quantity_value, self.quantity_unit)
    }

    /// Sets the structured quantity, keeping the unit/value invariant.
    pub fn set_quantity(&mut self, quantity: Quantity) {
        let q = Quantity::new(quantity.value, quantity.unit);
        self.quantity_value = q.value;
        self.quantity_unit = q.unit;
    }

    pub fn has_professor(&self) -> bool {
        !self.professor_id.is_empty()
    }

    pub fn has_location(&self) -> bool {
        !self.location_id.is_empty()
    }
}

// ==========================================
// ReagentDocument - stored shape
// ==========================================
/// Stored key → legacy Spanish key, mirroring the `alias` attributes below.
pub const REAGENT_FIELD_ALIASES: [(&str, &str); 12] = [
    ("name", "nombre"),
    ("brand", "marca"),
    ("class", "clase"),
    ("cabinet", "gabinete"),
    ("code", "codigo"),
    ("safetySheetUrl", "hDes"),
    ("expirationDate", "fechaDeVencimiento"),
    ("professorId", "docenteId"),
    ("locationId", "lugarId"),
    ("quantityValue", "cantidadValor"),
    ("quantityUnit", "cantidadUnidad"),
    ("legacyQuantity", "cantidadAlmacenada"),
];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ReagentDocument {
    #[serde(alias = "nombre", deserialize_with = "lenient::string")]
    name: String,
    #[serde(alias = "marca", deserialize_with = "lenient::string")]
    brand: String,
    #[serde(alias = "clase", deserialize_with = "lenient::string")]
    class: String,
    #[serde(alias = "gabinete", deserialize_with = "lenient::string")]
    cabinet: String,
    #[serde(alias = "codigo", deserialize_with = "lenient::string")]
    code: String,
    #[serde(alias = "hDes", deserialize_with = "lenient::string")]
    safety_sheet_url: String,
    #[serde(alias = "fechaDeVencimiento", deserialize_with = "lenient::string")]
    expiration_date: String,
    #[serde(alias = "docenteId", deserialize_with = "lenient::string")]
    professor_id: String,
    #[serde(alias = "lugarId", deserialize_with = "lenient::string")]
    location_id: String,
    #[serde(alias = "cantidadValor", deserialize_with = "lenient::number")]
    quantity_value: Option<f64>,
    #[serde(alias = "cantidadUnidad", deserialize_with = "lenient::string")]
    quantity_unit: String,
    #[serde(alias = "cantidadAlmacenada", deserialize_with = "lenient::optional_string")]
    legacy_quantity: Option<String>,
}

impl From<ReagentDocument> for Reagent {
    fn from(doc: ReagentDocument) -> Self {
        let quantity = Quantity::new(doc.quantity_value, QuantityUnit::from_token(&doc.quantity_unit));
        Reagent {
            name: doc.name,
            brand: doc.brand,
            class: doc.class,
            cabinet: doc.cabinet,
            code: doc.code,
            safety_sheet_url: doc.safety_sheet_url,
            expiration_date: doc.expiration_date,
            professor_id: doc.professor_id,
            location_id: doc.location_id,
            quantity_value: quantity.value,
            quantity_unit: quantity.unit,
            legacy_quantity: doc.legacy_quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_defaults_missing_fields() {
        let reagent: Reagent = serde_json::from_value(json!({ "name": "Acetona" })).unwrap();
        assert_eq!(reagent.name, "Acetona");
        assert_eq!(reagent.professor_id, "");
        assert_eq!(reagent.quantity_value, None);
        assert_eq!(reagent.quantity_unit, None);
        assert_eq!(reagent.legacy_quantity, None);
    }

    #[test]
    fn test_decode_legacy_spanish_fields() {
        let reagent: Reagent = serde_json::from_value(json!({
            "nombre": "Ácido sulfúrico",
            "docenteId": "p1",
            "lugarId": "l1",
            "gabinete": 3,
            "cantidadAlmacenada": 2.5,
            "hDes": "https://example.org/hds.pdf"
        }))
        .unwrap();

        assert_eq!(reagent.name, "Ácido sulfúrico");
        assert_eq!(reagent.professor_id, "p1");
        assert_eq!(reagent.location_id, "l1");
        assert_eq!(reagent.cabinet, "3");
        assert_eq!(reagent.legacy_quantity.as_deref(), Some("2.5"));
        assert_eq!(reagent.safety_sheet_url, "https://example.org/hds.pdf");
    }

    #[test]
    fn test_decode_enforces_unit_invariant() {
        let reagent: Reagent = serde_json::from_value(json!({
            "name": "X",
            "quantityValue": null,
            "quantityUnit": "mL"
        }))
        .unwrap();
        assert_eq!(reagent.quantity_unit, None);

        let reagent: Reagent = serde_json::from_value(json!({
            "name": "X",
            "quantityValue": "1,5",
            "quantityUnit": "kg"
        }))
        .unwrap();
        assert_eq!(reagent.quantity_value, Some(1.5));
        assert_eq!(reagent.quantity_unit, Some(QuantityUnit::Kilogram));
    }

    #[test]
    fn test_encode_uses_camel_case_and_empty_unit() {
        let reagent = Reagent::new("Etanol");
        let value = serde_json::to_value(&reagent).unwrap();
        assert_eq!(value["name"], "Etanol");
        assert_eq!(value["quantityUnit"], "");
        assert!(value["quantityValue"].is_null());
        assert!(value.get("legacyQuantity").is_none());
    }

    #[test]
    fn test_alias_table_matches_serialized_keys() {
        let mut reagent = Reagent::new("Acetona");
        reagent.quantity_value = Some(1.0);
        reagent.quantity_unit = Some(QuantityUnit::Liter);
        reagent.legacy_quantity = Some("1 L".to_string());
        let value = serde_json::to_value(&reagent).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();

        assert_eq!(keys.len(), REAGENT_FIELD_ALIASES.len());
        for (canonical, legacy) in REAGENT_FIELD_ALIASES {
            assert!(keys.contains(&canonical), "{} is not a stored key", canonical);
            let decoded: Result<Reagent, _> =
                serde_json::from_value(json!({ canonical: "1", legacy: "1" }));
            assert!(decoded.is_err(), "{} is not an alias of {}", legacy, canonical);
        }
    }
}
