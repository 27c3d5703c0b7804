// src/handlers/installment_plans.rs

use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::AdminGuard},
    models::installment_plan::{CreatePlanPayload, InstallmentPlan, PlanQuery, UpdatePlanPayload},
};

// GET /api/installment-plans
#[utoipa::path(
    get,
    path = "/api/installment-plans",
    tag = "Installment plans",
    params(PlanQuery),
    responses((status = 200, description = "Plans by sort order, then months", body = [InstallmentPlan])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn list_plans(
    State(app_state): State<AppState>,
    Query(query): Query<PlanQuery>,
) -> Result<ApiResponse<Vec<InstallmentPlan>>, AppError> {
    let plans = app_state.plan_service.list_plans(&query).await?;
    Ok(ApiResponse::ok(plans))
}

// GET /api/installment-plans/{id}
#[utoipa::path(
    get,
    path = "/api/installment-plans/{id}",
    tag = "Installment plans",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses(
        (status = 200, description = "Plan", body = InstallmentPlan),
        (status = 404, description = "Not found")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn get_plan(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<InstallmentPlan>, AppError> {
    let plan = app_state.plan_service.get_plan(id).await?;
    Ok(ApiResponse::ok(plan))
}

// POST /api/installment-plans
#[utoipa::path(
    post,
    path = "/api/installment-plans",
    tag = "Installment plans",
    request_body = CreatePlanPayload,
    responses((status = 201, description = "Plan created", body = InstallmentPlan)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn create_plan(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    user: AuthenticatedUser,
    Json(payload): Json<CreatePlanPayload>,
) -> Result<ApiResponse<InstallmentPlan>, AppError> {
    payload.validate()?;
    let plan = app_state.plan_service.create_plan(&user.0, &payload).await?;
    Ok(ApiResponse::created(plan))
}

// PUT /api/installment-plans/{id}
#[utoipa::path(
    put,
    path = "/api/installment-plans/{id}",
    tag = "Installment plans",
    request_body = UpdatePlanPayload,
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses((status = 200, description = "Plan updated", body = InstallmentPlan)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn update_plan(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlanPayload>,
) -> Result<ApiResponse<InstallmentPlan>, AppError> {
    payload.validate()?;
    let plan = app_state.plan_service.update_plan(&user.0, id, &payload).await?;
    Ok(ApiResponse::ok(plan))
}

// DELETE /api/installment-plans/{id}
#[utoipa::path(
    delete,
    path = "/api/installment-plans/{id}",
    tag = "Installment plans",
    params(("id" = Uuid, Path, description = "Plan ID")),
    responses((status = 200, description = "Plan deleted")),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn delete_plan(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    app_state.plan_service.delete_plan(&user.0, id).await?;
    Ok(ApiResponse::message("Installment plan deleted."))
}
