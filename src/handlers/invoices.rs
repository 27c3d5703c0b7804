// src/handlers/invoices.rs

use axum::{
    Json,
    extract::{Path, Query, State},
};
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
    middleware::{auth::AuthenticatedUser, rbac::AdminGuard},
    models::invoice::{CreateInvoicePayload, Invoice, InvoiceDetail, InvoiceQuery, InvoiceSummary},
};

// POST /api/invoices
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = "Invoices",
    request_body = CreateInvoicePayload,
    responses(
        (status = 201, description = "Invoice created with its schedule", body = InvoiceDetail),
        (status = 400, description = "Invalid items or sale terms"),
        (status = 409, description = "Insufficient stock")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<ApiResponse<InvoiceDetail>, AppError> {
    payload.validate()?;

    let detail = app_state
        .invoice_service
        .create_invoice(&payload, &user.0, today())
        .await?;

    Ok(ApiResponse::created(detail))
}

// GET /api/invoices
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Invoices",
    params(InvoiceQuery),
    responses((status = 200, description = "One page of invoices, newest first", body = [InvoiceSummary])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    Query(query): Query<InvoiceQuery>,
) -> Result<ApiResponse<Page<InvoiceSummary>>, AppError> {
    let page = PageRequest::new(query.page, query.per_page);
    let invoices = app_state.invoice_service.list_invoices(&query, page).await?;
    Ok(ApiResponse::ok(invoices))
}

// GET /api/invoices/{id}
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses((status = 200, description = "Invoice with items, installments and payments", body = InvoiceDetail)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<InvoiceDetail>, AppError> {
    let detail = app_state.invoice_service.get_invoice(id).await?;
    Ok(ApiResponse::ok(detail))
}

// POST /api/invoices/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/invoices/{id}/cancel",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice cancelled, stock returned", body = Invoice),
        (status = 409, description = "Already cancelled")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn cancel_invoice(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Invoice>, AppError> {
    let invoice = app_state.invoice_service.cancel_invoice(id, &user.0).await?;
    Ok(ApiResponse::ok(invoice).with_message("Invoice cancelled."))
}
