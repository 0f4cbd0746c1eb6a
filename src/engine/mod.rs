// ==========================================
// Reagent Inventory - Engine layer
// ==========================================
// Pure rules over in-memory records: text normalization,
// quantities, dates, reference resolution, filtering/sorting.
// Never touches storage.
// ==========================================

pub mod date_format;
pub mod quantity;
pub mod query;
pub mod reference_resolver;
pub mod text_normalizer;

pub use date_format::{date_sort_key, normalize_date_text, parse_flexible_date};
pub use quantity::{format_quantity, format_value, parse_quantity};
pub use query::{
    filter_reagents, matches_text, sort_reagents, ReagentColumn, ReagentQuery, SortDirection,
};
pub use reference_resolver::ReferenceIndex;
pub use text_normalizer::{natural_compare, normalize_for_search, strip_diacritics};
