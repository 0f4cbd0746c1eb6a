// ==========================================
// Reagent Inventory - Auth boundary
// ==========================================
// sign-in / sign-up / sign-out / current-user notifications
// Current user is observable through a watch channel; every
// change re-delivers the latest value only.
// ==========================================

use crate::auth::error::AuthResult;
use crate::domain::SessionUser;
use crate::repository::ListenerHandle;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Identity already verified by an external provider (e.g. Google).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// Provider id, e.g. `google.com`
    pub provider: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<SessionUser>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> AuthResult<SessionUser>;

    /// Signs in (creating the account on first use) with a verified identity.
    async fn sign_in_with_provider(&self, identity: ProviderIdentity) -> AuthResult<SessionUser>;

    async fn sign_out(&self) -> AuthResult<()>;

    fn current_user(&self) -> Option<SessionUser>;

    fn watch_current_user(&self) -> watch::Receiver<Option<SessionUser>>;

    /// Calls `callback` with the current user now and after every change,
    /// until the handle is dropped.
    fn on_current_user_changed(
        &self,
        mut callback: Box<dyn FnMut(Option<SessionUser>) + Send>,
    ) -> ListenerHandle {
        let mut rx = self.watch_current_user();
        let handle = tokio::spawn(async move {
            let user = rx.borrow_and_update().clone();
            callback(user);
            while rx.changed().await.is_ok() {
                let user = rx.borrow_and_update().clone();
                callback(user);
            }
        });
        ListenerHandle::from_task(handle)
    }
}
