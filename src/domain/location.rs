// ==========================================
// Reagent Inventory - Location domain model
// ==========================================
// Collection: locations (laboratory rooms)
// ==========================================

use crate::domain::lenient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub img: String,
}

impl Location {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            img: String::new(),
        }
    }
}
