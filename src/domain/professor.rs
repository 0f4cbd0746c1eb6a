// ==========================================
// Reagent Inventory - Professor domain model
// ==========================================
// Collection: professors
// Referenced by Reagent.professor_id (weak reference, no cascade)
// ==========================================

use crate::domain::lenient;
use crate::domain::types::ProfessorPosition;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ProfessorDocument")]
pub struct Professor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position: Option<ProfessorPosition>,
    pub photo: String,
}

impl Professor {
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: ProfessorPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// `firstName + " " + lastName`, used both for display and name matching.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProfessorDocument {
    #[serde(deserialize_with = "lenient::string")]
    first_name: String,
    #[serde(deserialize_with = "lenient::string")]
    last_name: String,
    /// Older documents kept a single `name` field.
    #[serde(deserialize_with = "lenient::string")]
    name: String,
    #[serde(deserialize_with = "lenient::string")]
    email: String,
    #[serde(deserialize_with = "position")]
    position: Option<ProfessorPosition>,
    #[serde(deserialize_with = "lenient::string")]
    photo: String,
}

fn position<'de, D>(deserializer: D) -> Result<Option<ProfessorPosition>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = lenient::optional_string(deserializer)?;
    Ok(raw.as_deref().and_then(ProfessorPosition::from_label))
}

impl From<ProfessorDocument> for Professor {
    fn from(doc: ProfessorDocument) -> Self {
        let (first_name, last_name) = if doc.first_name.is_empty() && doc.last_name.is_empty() {
            let name = doc.name.trim();
            match name.split_once(char::is_whitespace) {
                Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
                None => (name.to_string(), String::new()),
            }
        } else {
            (doc.first_name, doc.last_name)
        };

        Professor {
            first_name,
            last_name,
            email: doc.email,
            position: doc.position,
            photo: doc.photo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_name() {
        let p = Professor::new("Ana", "García", "ana@uni.edu");
        assert_eq!(p.full_name(), "Ana García");
    }

    #[test]
    fn test_decode_single_name_field() {
        let p: Professor = serde_json::from_value(json!({
            "name": "Juan Carlos Pérez",
            "email": "jcp@uni.edu"
        }))
        .unwrap();
        assert_eq!(p.first_name, "Juan");
        assert_eq!(p.last_name, "Carlos Pérez");
    }

    #[test]
    fn test_decode_unknown_position_is_none() {
        let p: Professor = serde_json::from_value(json!({
            "firstName": "Ana",
            "lastName": "García",
            "email": "ana@uni.edu",
            "position": "Decana"
        }))
        .unwrap();
        assert_eq!(p.position, None);

        let p: Professor = serde_json::from_value(json!({
            "firstName": "Ana",
            "position": "Ayudante"
        }))
        .unwrap();
        assert_eq!(p.position, Some(ProfessorPosition::Ayudante));
    }
}
