// ==========================================
// Reagent Inventory - Local auth provider
// ==========================================
// Accounts in the auth_user table
// Passwords: per-user random salt + SHA-256, hex encoded
// Provider accounts carry no password and cannot use sign_in
// ==========================================

use crate::auth::error::{AuthError, AuthResult};
use crate::auth::provider::{AuthProvider, ProviderIdentity};
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::SessionUser;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const PASSWORD_PROVIDER: &str = "password";

struct UserRow {
    uid: String,
    email: String,
    display_name: Option<String>,
    password_salt: Option<String>,
    password_hash: Option<String>,
}

impl UserRow {
    fn into_session_user(self) -> SessionUser {
        SessionUser {
            uid: self.uid,
            email: self.email,
            display_name: self.display_name,
        }
    }
}

pub struct LocalAuthProvider {
    conn: Arc<Mutex<Connection>>,
    current: watch::Sender<Option<SessionUser>>,
}

impl LocalAuthProvider {
    pub fn new(db_path: &str) -> AuthResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        let (current, _rx) = watch::channel(None);
        Self { conn, current }
    }

    fn get_conn(&self) -> AuthResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| AuthError::LockError(e.to_string()))
    }

    fn set_current(&self, user: Option<SessionUser>) {
        self.current.send_replace(user);
    }

    fn find_by_email(conn: &Connection, email: &str) -> AuthResult<Option<UserRow>> {
        let row = conn
            .query_row(
                r#"
                SELECT uid, email, display_name, password_salt, password_hash
                FROM auth_user WHERE email = ?1
                "#,
                params![email],
                |row| {
                    Ok(UserRow {
                        uid: row.get(0)?,
                        email: row.get(1)?,
                        display_name: row.get(2)?,
                        password_salt: row.get(3)?,
                        password_hash: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

fn normalize_email(email: &str) -> AuthResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AuthError::InvalidEmail(email)),
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn clean_display_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<SessionUser> {
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;
        let row = {
            let conn = self.get_conn()?;
            Self::find_by_email(&conn, &email)?
        };
        let row = row.ok_or(AuthError::InvalidCredentials)?;

        let (salt, stored_hash) = match (&row.password_salt, &row.password_hash) {
            (Some(salt), Some(hash)) => (salt.clone(), hash.clone()),
            _ => return Err(AuthError::ProviderAccount(email)),
        };
        if hash_password(&salt, password) != stored_hash {
            tracing::info!(email = %email, "sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let user = row.into_session_user();
        tracing::info!(uid = %user.uid, "signed in");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> AuthResult<SessionUser> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min_len: MIN_PASSWORD_LEN,
            });
        }

        let user = SessionUser {
            uid: Uuid::new_v4().simple().to_string(),
            email: email.clone(),
            display_name: clean_display_name(display_name),
        };
        let salt = Uuid::new_v4().simple().to_string();
        let hash = hash_password(&salt, password);

        {
            let conn = self.get_conn()?;
            if Self::find_by_email(&conn, &email)?.is_some() {
                return Err(AuthError::EmailInUse(email));
            }
            conn.execute(
                r#"
                INSERT INTO auth_user (uid, email, display_name, password_salt, password_hash, provider)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![user.uid, user.email, user.display_name, salt, hash, PASSWORD_PROVIDER],
            )?;
        }

        tracing::info!(uid = %user.uid, "account created");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in_with_provider(&self, identity: ProviderIdentity) -> AuthResult<SessionUser> {
        let email = normalize_email(&identity.email)?;
        let display_name = clean_display_name(identity.display_name.as_deref());

        let user = {
            let conn = self.get_conn()?;
            match Self::find_by_email(&conn, &email)? {
                Some(row) => {
                    let mut user = row.into_session_user();
                    if user.display_name.is_none() && display_name.is_some() {
                        conn.execute(
                            "UPDATE auth_user SET display_name = ?2 WHERE uid = ?1",
                            params![user.uid, display_name],
                        )?;
                        user.display_name = display_name;
                    }
                    user
                }
                None => {
                    let user = SessionUser {
                        uid: Uuid::new_v4().simple().to_string(),
                        email,
                        display_name,
                    };
                    conn.execute(
                        r#"
                        INSERT INTO auth_user (uid, email, display_name, provider)
                        VALUES (?1, ?2, ?3, ?4)
                        "#,
                        params![user.uid, user.email, user.display_name, identity.provider],
                    )?;
                    user
                }
            }
        };

        tracing::info!(uid = %user.uid, provider = %identity.provider, "signed in with provider");
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        if let Some(user) = self.current_user() {
            tracing::info!(uid = %user.uid, "signed out");
        }
        self.set_current(None);
        Ok(())
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.current.borrow().clone()
    }

    fn watch_current_user(&self) -> watch::Receiver<Option<SessionUser>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> LocalAuthProvider {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        LocalAuthProvider::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_hash_is_salted_hex() {
        let a = hash_password("s1", "secret");
        let b = hash_password("s2", "secret");
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = provider();
        let created = auth
            .sign_up(" Ana@Lab.org ", "secreto", Some("Ana"))
            .await
            .unwrap();
        assert_eq!(created.email, "ana@lab.org");
        auth.sign_out().await.unwrap();
        assert!(auth.current_user().is_none());

        let user = auth.sign_in("ana@lab.org", "secreto").await.unwrap();
        assert_eq!(user.uid, created.uid);
        assert_eq!(auth.current_user(), Some(user));
    }

    #[tokio::test]
    async fn test_sign_up_rules() {
        let auth = provider();
        assert!(matches!(
            auth.sign_up("ana@lab.org", "123", None).await,
            Err(AuthError::WeakPassword { .. })
        ));
        assert!(matches!(
            auth.sign_up("no-at-sign", "secreto", None).await,
            Err(AuthError::InvalidEmail(_))
        ));
        auth.sign_up("ana@lab.org", "secreto", None).await.unwrap();
        assert!(matches!(
            auth.sign_up("ANA@lab.org", "secreto", None).await,
            Err(AuthError::EmailInUse(_))
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_keeps_signed_out() {
        let auth = provider();
        auth.sign_up("ana@lab.org", "secreto", None).await.unwrap();
        auth.sign_out().await.unwrap();

        assert!(matches!(
            auth.sign_in("ana@lab.org", "otra-clave").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.sign_in("nadie@lab.org", "secreto").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(auth.current_user().is_none());
    }

    #[tokio::test]
    async fn test_provider_account_reused_and_password_sign_in_refused() {
        let auth = provider();
        let identity = ProviderIdentity {
            provider: "google.com".to_string(),
            email: "ana@lab.org".to_string(),
            display_name: Some("Ana Pérez".to_string()),
        };
        let first = auth.sign_in_with_provider(identity.clone()).await.unwrap();
        let second = auth.sign_in_with_provider(identity).await.unwrap();
        assert_eq!(first.uid, second.uid);
        assert_eq!(second.label(), "Ana Pérez");

        assert!(matches!(
            auth.sign_in("ana@lab.org", "whatever").await,
            Err(AuthError::ProviderAccount(_))
        ));
    }

    #[tokio::test]
    async fn test_current_user_notifications() {
        let auth = provider();
        let mut rx = auth.watch_current_user();
        assert!(rx.borrow_and_update().is_none());

        auth.sign_up("ana@lab.org", "secreto", None).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().map(|u| u.email.clone()), Some("ana@lab.org".to_string()));

        auth.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }
}
