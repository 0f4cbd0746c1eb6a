// ==========================================
// Reagent Inventory - Session context
// ==========================================
// The signed-in user is passed explicitly to every write path
// instead of being read from ambient state.
// ==========================================

use serde::{Deserialize, Serialize};

/// Identity supplied by the auth boundary. Never persisted by the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl SessionUser {
    /// Display name when present, email otherwise.
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    user: Option<SessionUser>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    pub fn from_user(user: Option<SessionUser>) -> Self {
        Self { user }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Write-capable operations are only offered to signed-in users.
    pub fn can_write(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_display_name() {
        let mut user = SessionUser {
            uid: "u1".to_string(),
            email: "ana@uni.edu".to_string(),
            display_name: Some("Ana".to_string()),
        };
        assert_eq!(user.label(), "Ana");

        user.display_name = Some("  ".to_string());
        assert_eq!(user.label(), "ana@uni.edu");
    }

    #[test]
    fn test_anonymous_cannot_write() {
        assert!(!SessionContext::anonymous().can_write());
    }
}
