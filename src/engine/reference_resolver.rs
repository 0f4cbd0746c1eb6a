// ==========================================
// Reagent Inventory - Entity reference resolvers
// ==========================================
// professor_id / location_id → display names, and the reverse
// lookup (id or name → id) used by the batch import.
// Dangling references never fail: they resolve to "" or to the
// localized fallback label.
// ==========================================

use crate::domain::{LocationDoc, ProfessorDoc};
use crate::i18n::t;

/// Borrowed view over the current professor and location sets.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceIndex<'a> {
    professors: &'a [ProfessorDoc],
    locations: &'a [LocationDoc],
}

impl<'a> ReferenceIndex<'a> {
    pub fn new(professors: &'a [ProfessorDoc], locations: &'a [LocationDoc]) -> Self {
        Self {
            professors,
            locations,
        }
    }

    pub fn empty() -> ReferenceIndex<'static> {
        ReferenceIndex {
            professors: &[],
            locations: &[],
        }
    }

    pub fn professors(&self) -> &'a [ProfessorDoc] {
        self.professors
    }

    pub fn locations(&self) -> &'a [LocationDoc] {
        self.locations
    }

    // ===== id → name =====

    /// Full name of the referenced professor, `""` when unresolved.
    pub fn professor_name(&self, id: &str) -> String {
        self.professors
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.record.full_name())
            .unwrap_or_default()
    }

    /// Name of the referenced location, `""` when unresolved.
    pub fn location_name(&self, id: &str) -> String {
        self.locations
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.record.name.clone())
            .unwrap_or_default()
    }

    /// Table label: the name, or "Sin docente encargado".
    pub fn professor_label(&self, id: &str) -> String {
        match self.professors.iter().find(|p| p.id == id) {
            Some(p) => p.record.full_name(),
            None => t("reagent.no_professor"),
        }
    }

    /// Table label: the name, or "Sin especificar".
    pub fn location_label(&self, id: &str) -> String {
        match self.locations.iter().find(|l| l.id == id) {
            Some(l) => l.record.name.clone(),
            None => t("reagent.no_location"),
        }
    }

    // ===== id-or-name → id =====

    /// Exact id match first, then case-insensitive full-name match.
    /// Unresolved → `""` (unassigned).
    pub fn resolve_professor_id(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        if let Some(p) = self.professors.iter().find(|p| p.id == raw) {
            return p.id.clone();
        }
        let wanted = raw.to_lowercase();
        self.professors
            .iter()
            .find(|p| p.record.full_name().to_lowercase() == wanted)
            .map(|p| p.id.clone())
            .unwrap_or_default()
    }

    /// Exact id match first, then case-insensitive name match.
    /// Unresolved → `""` (unassigned).
    pub fn resolve_location_id(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        if let Some(l) = self.locations.iter().find(|l| l.id == raw) {
            return l.id.clone();
        }
        let wanted = raw.to_lowercase();
        self.locations
            .iter()
            .find(|l| l.record.name.to_lowercase() == wanted)
            .map(|l| l.id.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, Professor, StoredDocument};

    fn fixtures() -> (Vec<ProfessorDoc>, Vec<LocationDoc>) {
        (
            vec![
                StoredDocument::new("p1", Professor::new("Ana", "García", "ana@uni.edu")),
                StoredDocument::new("p2", Professor::new("Luis", "Pérez", "luis@uni.edu")),
            ],
            vec![
                StoredDocument::new("l1", Location::new("204")),
                StoredDocument::new("l2", Location::new("Depósito Norte")),
            ],
        )
    }

    #[test]
    fn test_resolve_by_id_then_name() {
        let (profs, locs) = fixtures();
        let index = ReferenceIndex::new(&profs, &locs);

        assert_eq!(index.resolve_professor_id("p2"), "p2");
        assert_eq!(index.resolve_professor_id("ANA GARCÍA"), "p1");
        assert_eq!(index.resolve_location_id("204"), "l1");
        assert_eq!(index.resolve_location_id("depósito norte"), "l2");
    }

    #[test]
    fn test_unresolved_is_unassigned() {
        let (profs, locs) = fixtures();
        let index = ReferenceIndex::new(&profs, &locs);

        assert_eq!(index.resolve_professor_id("Nadie"), "");
        assert_eq!(index.resolve_professor_id(""), "");
        assert_eq!(index.resolve_location_id("999"), "");
    }

    #[test]
    fn test_names_for_dangling_ids() {
        let (profs, locs) = fixtures();
        let index = ReferenceIndex::new(&profs, &locs);

        assert_eq!(index.professor_name("p1"), "Ana García");
        assert_eq!(index.professor_name("gone"), "");
        assert_eq!(index.location_name("l2"), "Depósito Norte");
        assert_eq!(index.location_name(""), "");
    }
}
