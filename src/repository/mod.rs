// ==========================================
// Reagent Inventory - Repository layer
// ==========================================
// Document store boundary + typed repositories
// No business logic: the engine and importer decide what to write
// ==========================================

pub mod document_store;
pub mod entity_repo;
pub mod error;
pub mod sqlite_store;
pub mod subscription;

pub use document_store::DocumentStore;
pub use entity_repo::{EntityRepository, LocationRepository, ProfessorRepository, ReagentRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use sqlite_store::SqliteDocumentStore;
pub use subscription::{ListenerHandle, RawDocument, Snapshot, Subscription};
