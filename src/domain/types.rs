// ==========================================
// Reagent Inventory - Domain value types
// ==========================================
// Quantity units, professor positions, structured quantity
// ==========================================

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ==========================================
// QuantityUnit
// ==========================================
// Closed set: L / mL / g / Kg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityUnit {
    Liter,
    Milliliter,
    Gram,
    Kilogram,
}

impl QuantityUnit {
    pub const ALL: [QuantityUnit; 4] = [
        QuantityUnit::Liter,
        QuantityUnit::Milliliter,
        QuantityUnit::Gram,
        QuantityUnit::Kilogram,
    ];

    /// Maps a free-form unit token (case-insensitive) to a unit.
    ///
    /// `l → L`, `ml → mL`, `g → g`, `kg → Kg`; anything else is `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "l" => Some(QuantityUnit::Liter),
            "ml" => Some(QuantityUnit::Milliliter),
            "g" => Some(QuantityUnit::Gram),
            "kg" => Some(QuantityUnit::Kilogram),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityUnit::Liter => "L",
            QuantityUnit::Milliliter => "mL",
            QuantityUnit::Gram => "g",
            QuantityUnit::Kilogram => "Kg",
        }
    }
}

impl fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored form of an optional unit: `""` when unset.
pub mod unit_serde {
    use super::*;

    pub fn serialize<S>(unit: &Option<QuantityUnit>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(unit.map(|u| u.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<QuantityUnit>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(QuantityUnit::from_token))
    }
}

// ==========================================
// Quantity - structured (value, unit) pair
// ==========================================
// Invariant: unit is None whenever value is None
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quantity {
    pub value: Option<f64>,
    pub unit: Option<QuantityUnit>,
}

impl Quantity {
    pub fn new(value: Option<f64>, unit: Option<QuantityUnit>) -> Self {
        let value = value.filter(|v| v.is_finite());
        Self {
            value,
            unit: if value.is_some() { unit } else { None },
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Unit as stored: `""` when unset.
    pub fn unit_str(&self) -> &'static str {
        self.unit.map(|u| u.as_str()).unwrap_or("")
    }
}

// ==========================================
// ProfessorPosition
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfessorPosition {
    #[serde(rename = "Profesor Titular")]
    Titular,
    #[serde(rename = "Profesor Asociado")]
    Asociado,
    #[serde(rename = "Profesor Adjunto")]
    Adjunto,
    #[serde(rename = "Jefe de Trabajos Prácticos")]
    JefeTrabajosPracticos,
    #[serde(rename = "Ayudante")]
    Ayudante,
}

impl ProfessorPosition {
    pub const ALL: [ProfessorPosition; 5] = [
        ProfessorPosition::Titular,
        ProfessorPosition::Asociado,
        ProfessorPosition::Adjunto,
        ProfessorPosition::JefeTrabajosPracticos,
        ProfessorPosition::Ayudante,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProfessorPosition::Titular => "Profesor Titular",
            ProfessorPosition::Asociado => "Profesor Asociado",
            ProfessorPosition::Adjunto => "Profesor Adjunto",
            ProfessorPosition::JefeTrabajosPracticos => "Jefe de Trabajos Prácticos",
            ProfessorPosition::Ayudante => "Ayudante",
        }
    }

    /// Lenient lookup by label, case-insensitive.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for ProfessorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_from_token() {
        assert_eq!(QuantityUnit::from_token("KG"), Some(QuantityUnit::Kilogram));
        assert_eq!(QuantityUnit::from_token("ml"), Some(QuantityUnit::Milliliter));
        assert_eq!(QuantityUnit::from_token("l"), Some(QuantityUnit::Liter));
        assert_eq!(QuantityUnit::from_token("g"), Some(QuantityUnit::Gram));
        assert_eq!(QuantityUnit::from_token("oz"), None);
        assert_eq!(QuantityUnit::from_token(""), None);
    }

    #[test]
    fn test_quantity_drops_unit_without_value() {
        let q = Quantity::new(None, Some(QuantityUnit::Liter));
        assert_eq!(q.unit, None);
        assert_eq!(q.unit_str(), "");

        let q = Quantity::new(Some(f64::NAN), Some(QuantityUnit::Gram));
        assert!(q.is_empty());
        assert_eq!(q.unit, None);
    }

    #[test]
    fn test_position_from_label() {
        assert_eq!(
            ProfessorPosition::from_label("profesor adjunto"),
            Some(ProfessorPosition::Adjunto)
        );
        assert_eq!(ProfessorPosition::from_label("Decano"), None);
    }
}
