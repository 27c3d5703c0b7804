// src/handlers/installments.rs

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
        response::ApiResponse,
    },
    config::AppState,
    handlers::today,
    middleware::auth::AuthenticatedUser,
    models::installment::{
        CalendarDay, CalendarQuery, InstallmentQuery, InstallmentStats, InstallmentView,
        PayInstallmentPayload, PaymentOutcome,
    },
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepResult {
    pub updated: u64,
}

// GET /api/installments
#[utoipa::path(
    get,
    path = "/api/installments",
    tag = "Installments",
    params(InstallmentQuery),
    responses((status = 200, description = "One page of installments by due date", body = [InstallmentView])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn list_installments(
    State(app_state): State<AppState>,
    Query(query): Query<InstallmentQuery>,
) -> Result<ApiResponse<Page<InstallmentView>>, AppError> {
    let page = PageRequest::new(query.page, query.per_page);
    let installments = app_state
        .ledger_service
        .list_installments(&query, page, today())
        .await?;
    Ok(ApiResponse::ok(installments))
}

// GET /api/installments/{id}
#[utoipa::path(
    get,
    path = "/api/installments/{id}",
    tag = "Installments",
    params(("id" = Uuid, Path, description = "Installment ID")),
    responses((status = 200, description = "Installment", body = InstallmentView)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn get_installment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<InstallmentView>, AppError> {
    let installment = app_state.ledger_service.get_installment(id, today()).await?;
    Ok(ApiResponse::ok(installment))
}

// GET /api/installments/today
#[utoipa::path(
    get,
    path = "/api/installments/today",
    tag = "Installments",
    responses((status = 200, description = "Unpaid installments due today", body = [InstallmentView])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn due_today(State(app_state): State<AppState>) -> Result<ApiResponse<Vec<InstallmentView>>, AppError> {
    let installments = app_state.ledger_service.get_today(today()).await?;
    Ok(ApiResponse::ok(installments))
}

// GET /api/installments/overdue
#[utoipa::path(
    get,
    path = "/api/installments/overdue",
    tag = "Installments",
    responses((status = 200, description = "Overdue installments, oldest first", body = [InstallmentView])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn overdue(State(app_state): State<AppState>) -> Result<ApiResponse<Vec<InstallmentView>>, AppError> {
    let installments = app_state.ledger_service.get_overdue(today()).await?;
    Ok(ApiResponse::ok(installments))
}

// GET /api/installments/stats
#[utoipa::path(
    get,
    path = "/api/installments/stats",
    tag = "Installments",
    responses((status = 200, description = "Overdue and due-today counts and amounts", body = InstallmentStats)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn stats(State(app_state): State<AppState>) -> Result<ApiResponse<InstallmentStats>, AppError> {
    let stats = app_state.ledger_service.get_stats(today()).await?;
    Ok(ApiResponse::ok(stats))
}

// GET /api/installments/calendar
#[utoipa::path(
    get,
    path = "/api/installments/calendar",
    tag = "Installments",
    params(CalendarQuery),
    responses((status = 200, description = "Unpaid installments of the month grouped by day", body = [CalendarDay])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn calendar(
    State(app_state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<ApiResponse<Vec<CalendarDay>>, AppError> {
    let days = app_state
        .ledger_service
        .calendar(query.year, query.month, today())
        .await?;
    Ok(ApiResponse::ok(days))
}

// POST /api/installments/{id}/pay
#[utoipa::path(
    post,
    path = "/api/installments/{id}/pay",
    tag = "Installments",
    request_body = PayInstallmentPayload,
    params(("id" = Uuid, Path, description = "Installment ID")),
    responses(
        (status = 201, description = "Payment recorded", body = PaymentOutcome),
        (status = 400, description = "Amount is not positive or exceeds what is owed"),
        (status = 409, description = "Installment already paid or invoice cancelled")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn pay_installment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayInstallmentPayload>,
) -> Result<ApiResponse<PaymentOutcome>, AppError> {
    payload.validate()?;

    let outcome = app_state
        .ledger_service
        .apply_payment(id, &payload, &user.0, today())
        .await?;

    let message = format!("Receipt {} recorded.", outcome.payment.receipt_number);
    Ok(ApiResponse::created(outcome).with_message(message))
}

// POST /api/installments/sweep
#[utoipa::path(
    post,
    path = "/api/installments/sweep",
    tag = "Installments",
    responses((status = 200, description = "Number of installments marked overdue", body = SweepResult)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn sweep(State(app_state): State<AppState>) -> Result<ApiResponse<SweepResult>, AppError> {
    let updated = app_state.ledger_service.sweep_overdue(today()).await?;
    Ok(ApiResponse::ok(SweepResult { updated }))
}
