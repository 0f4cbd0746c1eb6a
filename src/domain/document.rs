// ==========================================
// Reagent Inventory - Stored documents
// ==========================================
// Every entity lives in a named collection under a
// system-assigned opaque id.
// ==========================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::reagent::REAGENT_FIELD_ALIASES;
use crate::domain::{Location, Professor, Reagent};

// ==========================================
// CollectionName
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionName {
    Reagents,
    Professors,
    Locations,
}

impl CollectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Reagents => "reagents",
            CollectionName::Professors => "professors",
            CollectionName::Locations => "locations",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record type persisted in one fixed collection.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: CollectionName;

    /// `(canonical, legacy)` key pairs accepted when decoding.
    /// A stored document must never carry both keys of a pair.
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &[];

    /// Legacy spellings of `field`.
    fn legacy_keys(field: &str) -> Vec<&'static str> {
        Self::FIELD_ALIASES
            .iter()
            .filter(|(canonical, _)| *canonical == field)
            .map(|(_, legacy)| *legacy)
            .collect()
    }
}

impl Entity for Reagent {
    const COLLECTION: CollectionName = CollectionName::Reagents;
    const FIELD_ALIASES: &'static [(&'static str, &'static str)] = &REAGENT_FIELD_ALIASES;
}

impl Entity for Professor {
    const COLLECTION: CollectionName = CollectionName::Professors;
}

impl Entity for Location {
    const COLLECTION: CollectionName = CollectionName::Locations;
}

// ==========================================
// StoredDocument - id + record
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument<T> {
    pub id: String,
    #[serde(flatten)]
    pub record: T,
}

impl<T> StoredDocument<T> {
    pub fn new(id: impl Into<String>, record: T) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }
}

pub type ReagentDoc = StoredDocument<Reagent>;
pub type ProfessorDoc = StoredDocument<Professor>;
pub type LocationDoc = StoredDocument<Location>;
