// ==========================================
// Reagent Inventory - Record query engine
// ==========================================
// Pure derived view over an in-memory reagent set:
//   text filter (OR across searchable projections)
//   AND location filter (exact id)
//   per-column natural sort
// No state, no side effects.
// ==========================================

use crate::domain::ReagentDoc;
use crate::engine::date_format::date_sort_key;
use crate::engine::quantity::format_quantity;
use crate::engine::reference_resolver::ReferenceIndex;
use crate::engine::text_normalizer::{natural_compare, normalize_for_search};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ==========================================
// ReagentQuery - filter inputs
// ==========================================
/// Free text plus optional location id; the home view hands this to the
/// reagent table (`?query=&location=`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReagentQuery {
    pub text: String,
    pub location_id: Option<String>,
}

impl ReagentQuery {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            location_id: None,
        }
    }

    pub fn at_location(location_id: &str) -> Self {
        Self {
            text: String::new(),
            location_id: Some(location_id.to_string()),
        }
    }

    pub fn with_location(mut self, location_id: Option<&str>) -> Self {
        self.location_id = location_id.map(str::to_string);
        self
    }

    pub fn clear_location(&mut self) {
        self.location_id = None;
    }

    pub fn apply(&self, records: &[ReagentDoc], refs: &ReferenceIndex<'_>) -> Vec<ReagentDoc> {
        filter_reagents(records, &self.text, self.location_id.as_deref(), refs)
    }

    /// Chip label for the active location filter.
    pub fn location_label(&self, refs: &ReferenceIndex<'_>) -> Option<String> {
        self.location_id.as_deref().map(|id| {
            let name = refs.location_name(id);
            if name.is_empty() {
                crate::i18n::t("reagent.location_chip")
            } else {
                name
            }
        })
    }
}

/// Searchable projections, in match order.
fn search_projections(doc: &ReagentDoc, refs: &ReferenceIndex<'_>) -> [String; 9] {
    let r = &doc.record;
    [
        r.name.clone(),
        r.brand.clone(),
        r.class.clone(),
        r.cabinet.clone(),
        r.code.clone(),
        r.safety_sheet_url.clone(),
        refs.professor_name(&r.professor_id),
        refs.location_name(&r.location_id),
        format_quantity(r),
    ]
}

/// True when any searchable projection contains the (already normalized) needle.
pub fn matches_text(doc: &ReagentDoc, normalized_query: &str, refs: &ReferenceIndex<'_>) -> bool {
    search_projections(doc, refs)
        .iter()
        .any(|field| normalize_for_search(field).contains(normalized_query))
}

/// Filtered view, source order preserved.
///
/// - non-empty `text_query`: keep records where some projection contains it
///   (diacritic/case-insensitive)
/// - `location_filter`: keep records whose `location_id` equals it exactly
pub fn filter_reagents(
    records: &[ReagentDoc],
    text_query: &str,
    location_filter: Option<&str>,
    refs: &ReferenceIndex<'_>,
) -> Vec<ReagentDoc> {
    let normalized = (!text_query.is_empty()).then(|| normalize_for_search(text_query));

    records
        .iter()
        .filter(|doc| match &normalized {
            Some(q) => matches_text(doc, q, refs),
            None => true,
        })
        .filter(|doc| match location_filter {
            Some(loc) => doc.record.location_id == loc,
            None => true,
        })
        .cloned()
        .collect()
}

// ==========================================
// Columns and sorting
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReagentColumn {
    Name,
    Brand,
    Class,
    Quantity,
    ExpirationDate,
    Professor,
    Location,
    Cabinet,
    Code,
    SafetySheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl ReagentColumn {
    /// Table order.
    pub const ALL: [ReagentColumn; 10] = [
        ReagentColumn::Name,
        ReagentColumn::Brand,
        ReagentColumn::Class,
        ReagentColumn::Quantity,
        ReagentColumn::ExpirationDate,
        ReagentColumn::Professor,
        ReagentColumn::Location,
        ReagentColumn::Cabinet,
        ReagentColumn::Code,
        ReagentColumn::SafetySheet,
    ];

    /// Quantity and safety-sheet link are never sortable.
    pub fn is_sortable(&self) -> bool {
        !matches!(self, ReagentColumn::Quantity | ReagentColumn::SafetySheet)
    }

    pub fn title_key(&self) -> &'static str {
        match self {
            ReagentColumn::Name => "column.name",
            ReagentColumn::Brand => "column.brand",
            ReagentColumn::Class => "column.class",
            ReagentColumn::Quantity => "column.quantity",
            ReagentColumn::ExpirationDate => "column.expiration_date",
            ReagentColumn::Professor => "column.professor",
            ReagentColumn::Location => "column.location",
            ReagentColumn::Cabinet => "column.cabinet",
            ReagentColumn::Code => "column.code",
            ReagentColumn::SafetySheet => "column.safety_sheet",
        }
    }

    pub fn title(&self) -> String {
        crate::i18n::t(self.title_key())
    }

    /// Cell text as shown in the table.
    pub fn display(&self, doc: &ReagentDoc, refs: &ReferenceIndex<'_>) -> String {
        let r = &doc.record;
        match self {
            ReagentColumn::Name => r.name.clone(),
            ReagentColumn::Brand => r.brand.clone(),
            ReagentColumn::Class => r.class.clone(),
            ReagentColumn::Quantity => format_quantity(r),
            ReagentColumn::ExpirationDate => r.expiration_date.clone(),
            ReagentColumn::Professor => refs.professor_label(&r.professor_id),
            ReagentColumn::Location => refs.location_label(&r.location_id),
            ReagentColumn::Cabinet => r.cabinet.clone(),
            ReagentColumn::Code => r.code.clone(),
            ReagentColumn::SafetySheet => r.safety_sheet_url.clone(),
        }
    }

    /// Column comparator; `None` for non-sortable columns.
    pub fn compare(
        &self,
        a: &ReagentDoc,
        b: &ReagentDoc,
        refs: &ReferenceIndex<'_>,
    ) -> Option<Ordering> {
        let (x, y) = (&a.record, &b.record);
        let ord = match self {
            ReagentColumn::Name => natural_compare(&x.name, &y.name),
            ReagentColumn::Brand => natural_compare(&x.brand, &y.brand),
            ReagentColumn::Class => natural_compare(&x.class, &y.class),
            ReagentColumn::Cabinet => natural_compare(&x.cabinet, &y.cabinet),
            ReagentColumn::Code => natural_compare(&x.code, &y.code),
            ReagentColumn::Professor => natural_compare(
                &refs.professor_name(&x.professor_id),
                &refs.professor_name(&y.professor_id),
            ),
            ReagentColumn::Location => natural_compare(
                &refs.location_name(&x.location_id),
                &refs.location_name(&y.location_id),
            ),
            ReagentColumn::ExpirationDate => {
                date_sort_key(&x.expiration_date).cmp(&date_sort_key(&y.expiration_date))
            }
            ReagentColumn::Quantity | ReagentColumn::SafetySheet => return None,
        };
        Some(ord)
    }
}

/// Stable in-place sort; a non-sortable column leaves the order untouched.
pub fn sort_reagents(
    records: &mut [ReagentDoc],
    column: ReagentColumn,
    direction: SortDirection,
    refs: &ReferenceIndex<'_>,
) {
    if !column.is_sortable() {
        return;
    }
    records.sort_by(|a, b| {
        let ord = column.compare(a, b, refs).unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
