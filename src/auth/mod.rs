// ==========================================
// Reagent Inventory - Auth layer
// ==========================================
// Boundary trait + local SQLite-backed provider
// ==========================================

pub mod error;
pub mod local_provider;
pub mod provider;

pub use error::{AuthError, AuthResult};
pub use local_provider::{LocalAuthProvider, MIN_PASSWORD_LEN};
pub use provider::{AuthProvider, ProviderIdentity};
