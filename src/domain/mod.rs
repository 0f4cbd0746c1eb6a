// ==========================================
// Reagent Inventory - Domain layer
// ==========================================
// Entities, value types, session context
// No storage access, no engine logic
// ==========================================

pub mod document;
pub mod lenient;
pub mod location;
pub mod professor;
pub mod reagent;
pub mod session;
pub mod types;

pub use document::{
    CollectionName, Entity, LocationDoc, ProfessorDoc, ReagentDoc, StoredDocument,
};
pub use location::Location;
pub use professor::Professor;
pub use reagent::Reagent;
pub use session::{SessionContext, SessionUser};
pub use types::{ProfessorPosition, Quantity, QuantityUnit};
