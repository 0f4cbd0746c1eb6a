// ==========================================
// Reagent Inventory - Auth error types
// ==========================================
// Tooling: thiserror
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("wrong email or password")]
    InvalidCredentials,

    #[error("email already registered: {0}")]
    EmailInUse(String),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("password must be at least {min_len} characters")]
    WeakPassword { min_len: usize },

    #[error("account {0} signs in through its identity provider")]
    ProviderAccount(String),

    #[error("sign-up is disabled")]
    SignUpDisabled,

    #[error("not signed in")]
    NotAuthenticated,

    #[error("auth store error: {0}")]
    StoreError(String),

    #[error("auth lock poisoned: {0}")]
    LockError(String),
}

impl From<rusqlite::Error> for AuthError {
    fn from(err: rusqlite::Error) -> Self {
        AuthError::StoreError(err.to_string())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
