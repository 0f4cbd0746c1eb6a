// ==========================================
// Reagent Inventory - Auth API
// ==========================================
// Thin façade over the auth boundary; hands out the explicit
// SessionContext that every write path takes.
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::auth::{AuthError, AuthProvider, ProviderIdentity};
use crate::config::ConfigManager;
use crate::domain::{SessionContext, SessionUser};
use crate::repository::ListenerHandle;

pub struct AuthApi {
    provider: Arc<dyn AuthProvider>,
    config: Arc<ConfigManager>,
}

impl AuthApi {
    pub fn new(provider: Arc<dyn AuthProvider>, config: Arc<ConfigManager>) -> Self {
        Self { provider, config }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<SessionUser> {
        Ok(self.provider.sign_in(email, password).await?)
    }

    /// Fails with `AuthFailed` when `auth.allow_sign_up` is off.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> ApiResult<SessionUser> {
        if !self.config.get_allow_sign_up()? {
            return Err(ApiError::from(AuthError::SignUpDisabled));
        }
        Ok(self.provider.sign_up(email, password, display_name).await?)
    }

    pub async fn sign_in_with_provider(&self, identity: ProviderIdentity) -> ApiResult<SessionUser> {
        Ok(self.provider.sign_in_with_provider(identity).await?)
    }

    pub async fn sign_out(&self) -> ApiResult<()> {
        Ok(self.provider.sign_out().await?)
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.provider.current_user()
    }

    /// Snapshot of the current session for write calls.
    pub fn session(&self) -> SessionContext {
        SessionContext::from_user(self.provider.current_user())
    }

    pub fn on_current_user_changed<F>(&self, callback: F) -> ListenerHandle
    where
        F: FnMut(Option<SessionUser>) + Send + 'static,
    {
        self.provider.on_current_user_changed(Box::new(callback))
    }
}
