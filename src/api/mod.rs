// ==========================================
// Reagent Inventory - API layer
// ==========================================
// One façade per entity + auth
// Writes take an explicit SessionContext and are refused without a user
// ==========================================

pub mod auth_api;
pub mod error;
pub mod location_api;
pub mod professor_api;
pub mod reagent_api;

pub use auth_api::AuthApi;
pub use error::{ApiError, ApiResult};
pub use location_api::LocationApi;
pub use professor_api::ProfessorApi;
pub use reagent_api::{column_catalogue, ColumnInfo, ReagentApi, ReagentForm, ReagentRow, ReagentView};

use crate::domain::{SessionContext, SessionUser};

/// Signed-in user of `ctx`, or `Unauthorized`.
pub(crate) fn require_session(ctx: &SessionContext) -> ApiResult<&SessionUser> {
    ctx.user().ok_or(ApiError::Unauthorized)
}
