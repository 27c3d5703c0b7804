// src/handlers/activity.rs

use axum::extract::{Query, State};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::rbac::AdminGuard,
    models::activity::{ActivityEntry, ActivityQuery},
};

// GET /api/activity
#[utoipa::path(
    get,
    path = "/api/activity",
    tag = "Activity",
    params(ActivityQuery),
    responses((status = 200, description = "Staff actions, most recent first", body = [ActivityEntry])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn list_activity(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    Query(query): Query<ActivityQuery>,
) -> Result<ApiResponse<Vec<ActivityEntry>>, AppError> {
    let entries = app_state.activity_service.recent(&query).await?;
    Ok(ApiResponse::ok(entries))
}
