// src/handlers/payments.rs

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PageRequest, response::ApiResponse},
    config::AppState,
    handlers::today,
    models::{
        payment::{PaymentList, PaymentQuery, PaymentView, TodayPayments},
        report::Period,
    },
};

// GET /api/payments
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    params(PaymentQuery),
    responses((status = 200, description = "Payments in the range, newest first, with the range total", body = [PaymentView])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    Query(query): Query<PaymentQuery>,
) -> Result<ApiResponse<PaymentList>, AppError> {
    let period = Period::resolve(query.from, query.to, today())?;
    let page = PageRequest::new(query.page, query.per_page);
    let payments = app_state.payment_service.list_payments(period, page).await?;
    Ok(ApiResponse::ok(payments))
}

// GET /api/payments/today
#[utoipa::path(
    get,
    path = "/api/payments/today",
    tag = "Payments",
    responses((status = 200, description = "Payments received today", body = TodayPayments)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn today_payments(State(app_state): State<AppState>) -> Result<ApiResponse<TodayPayments>, AppError> {
    let payments = app_state.payment_service.today_payments(today()).await?;
    Ok(ApiResponse::ok(payments))
}

// GET /api/payments/{id}
#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses((status = 200, description = "Payment", body = PaymentView)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn get_payment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<PaymentView>, AppError> {
    let payment = app_state.payment_service.get_payment(id).await?;
    Ok(ApiResponse::ok(payment))
}

// GET /api/payments/{id}/receipt.pdf
#[utoipa::path(
    get,
    path = "/api/payments/{id}/receipt.pdf",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses((status = 200, description = "Printable receipt", content_type = "application/pdf")),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn receipt_pdf(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let pdf_bytes = app_state.document_service.receipt_pdf(id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"receipt_{}.pdf\"", id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
