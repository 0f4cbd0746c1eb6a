// ==========================================
// Reagent Inventory - Location API
// ==========================================
// CRUD + live subscription over the locations collection
// ==========================================

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::require_session;
use crate::domain::{Location, LocationDoc, SessionContext};
use crate::repository::{ListenerHandle, LocationRepository, Subscription};

pub struct LocationApi {
    location_repo: LocationRepository,
}

impl LocationApi {
    pub fn new(location_repo: LocationRepository) -> Self {
        Self { location_repo }
    }

    fn validate(location: &Location) -> ApiResult<Location> {
        let cleaned = Location {
            name: location.name.trim().to_string(),
            img: location.img.trim().to_string(),
        };
        if cleaned.name.is_empty() {
            return Err(ApiError::InvalidInput("location name is required".to_string()));
        }
        Ok(cleaned)
    }

    pub async fn list_locations(&self) -> ApiResult<Vec<LocationDoc>> {
        Ok(self.location_repo.list().await?)
    }

    pub async fn get_location(&self, id: &str) -> ApiResult<LocationDoc> {
        self.location_repo
            .get(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("locations/{}", id)))
    }

    pub async fn create_location(&self, ctx: &SessionContext, location: &Location) -> ApiResult<String> {
        let user = require_session(ctx)?;
        let location = Self::validate(location)?;
        let id = self.location_repo.create(&location).await?;
        info!(collection = "locations", id = %id, uid = %user.uid, "location created");
        Ok(id)
    }

    pub async fn update_location(
        &self,
        ctx: &SessionContext,
        id: &str,
        location: &Location,
    ) -> ApiResult<()> {
        let user = require_session(ctx)?;
        let location = Self::validate(location)?;
        self.location_repo.update(id, &location).await?;
        info!(collection = "locations", id = %id, uid = %user.uid, "location updated");
        Ok(())
    }

    pub async fn delete_location(&self, ctx: &SessionContext, id: &str) -> ApiResult<()> {
        let user = require_session(ctx)?;
        self.location_repo.delete(id).await?;
        info!(collection = "locations", id = %id, uid = %user.uid, "location deleted");
        Ok(())
    }

    /// Live location list: the full set on every change.
    pub async fn subscribe(&self) -> ApiResult<Subscription<Location>> {
        Ok(self.location_repo.subscribe().await?)
    }

    pub async fn on_locations_changed<F>(&self, on_change: F) -> ApiResult<ListenerHandle>
    where
        F: FnMut(Vec<LocationDoc>) + Send + 'static,
    {
        Ok(self.subscribe().await?.on_change(on_change))
    }
}
