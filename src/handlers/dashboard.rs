// src/handlers/dashboard.rs

use axum::extract::State;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    handlers::today,
    models::dashboard::DashboardStats,
};

// GET /api/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses((status = 200, description = "Today's sales, collections and installment figures", body = DashboardStats)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn get_stats(State(app_state): State<AppState>) -> Result<ApiResponse<DashboardStats>, AppError> {
    let stats = app_state.dashboard_service.get_stats(today()).await?;
    Ok(ApiResponse::ok(stats))
}
