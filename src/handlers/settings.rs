// src/handlers/settings.rs

use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::rbac::AdminGuard,
    models::settings::{ShopSettings, UpdateSettingsRequest},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses((status = 200, description = "Shop settings", body = ShopSettings)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn get_settings(State(app_state): State<AppState>) -> Result<ApiResponse<ShopSettings>, AppError> {
    let settings = app_state.settings_repo.get_settings().await?;
    Ok(ApiResponse::ok(settings))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    responses((status = 200, description = "Settings saved", body = ShopSettings)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<ApiResponse<ShopSettings>, AppError> {
    payload.validate()?;
    let updated = app_state.settings_repo.update_settings(&payload).await?;
    tracing::info!("Shop settings updated");
    Ok(ApiResponse::ok(updated))
}
