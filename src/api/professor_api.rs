// ==========================================
// Reagent Inventory - Professor API
// ==========================================
// CRUD + live subscription over the professors collection
// Deleting a professor leaves referencing reagents untouched
// ==========================================

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::require_session;
use crate::domain::{Professor, ProfessorDoc, SessionContext};
use crate::repository::{ListenerHandle, ProfessorRepository, Subscription};

pub struct ProfessorApi {
    professor_repo: ProfessorRepository,
}

impl ProfessorApi {
    pub fn new(professor_repo: ProfessorRepository) -> Self {
        Self { professor_repo }
    }

    fn validate(professor: &Professor) -> ApiResult<Professor> {
        let cleaned = Professor {
            first_name: professor.first_name.trim().to_string(),
            last_name: professor.last_name.trim().to_string(),
            email: professor.email.trim().to_string(),
            position: professor.position,
            photo: professor.photo.trim().to_string(),
        };
        if cleaned.first_name.is_empty() || cleaned.last_name.is_empty() {
            return Err(ApiError::InvalidInput("first and last name are required".to_string()));
        }
        if cleaned.email.is_empty() {
            return Err(ApiError::InvalidInput("email is required".to_string()));
        }
        Ok(cleaned)
    }

    pub async fn list_professors(&self) -> ApiResult<Vec<ProfessorDoc>> {
        Ok(self.professor_repo.list().await?)
    }

    pub async fn get_professor(&self, id: &str) -> ApiResult<ProfessorDoc> {
        self.professor_repo
            .get(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("professors/{}", id)))
    }

    pub async fn create_professor(&self, ctx: &SessionContext, professor: &Professor) -> ApiResult<String> {
        let user = require_session(ctx)?;
        let professor = Self::validate(professor)?;
        let id = self.professor_repo.create(&professor).await?;
        info!(collection = "professors", id = %id, uid = %user.uid, "professor created");
        Ok(id)
    }

    pub async fn update_professor(
        &self,
        ctx: &SessionContext,
        id: &str,
        professor: &Professor,
    ) -> ApiResult<()> {
        let user = require_session(ctx)?;
        let professor = Self::validate(professor)?;
        self.professor_repo.update(id, &professor).await?;
        info!(collection = "professors", id = %id, uid = %user.uid, "professor updated");
        Ok(())
    }

    pub async fn delete_professor(&self, ctx: &SessionContext, id: &str) -> ApiResult<()> {
        let user = require_session(ctx)?;
        self.professor_repo.delete(id).await?;
        info!(collection = "professors", id = %id, uid = %user.uid, "professor deleted");
        Ok(())
    }

    /// Live professor list: the full set on every change.
    pub async fn subscribe(&self) -> ApiResult<Subscription<Professor>> {
        Ok(self.professor_repo.subscribe().await?)
    }

    /// Callback form of [`subscribe`](Self::subscribe).
    pub async fn on_professors_changed<F>(&self, on_change: F) -> ApiResult<ListenerHandle>
    where
        F: FnMut(Vec<ProfessorDoc>) + Send + 'static,
    {
        Ok(self.subscribe().await?.on_change(on_change))
    }
}
