// src/handlers/reports.rs

use axum::extract::{Query, State};

use crate::{
    common::{error::AppError, pagination::PageRequest, response::ApiResponse},
    config::AppState,
    handlers::today,
    middleware::rbac::AdminGuard,
    models::report::{
        CollectionsReport, OverdueCustomerRow, OverdueReport, Period, ProfitReport, ProfitRow,
        ReportQuery, SalesReport,
    },
};

// GET /api/reports/profits
#[utoipa::path(
    get,
    path = "/api/reports/profits",
    tag = "Reports",
    params(ReportQuery),
    responses((status = 200, description = "Profit per product with grand totals", body = [ProfitRow])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn profits(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    Query(query): Query<ReportQuery>,
) -> Result<ApiResponse<ProfitReport>, AppError> {
    let period = Period::resolve(query.from, query.to, today())?;
    let page = PageRequest::new(query.page, query.per_page);
    let report = app_state.report_service.profits(period, page).await?;
    Ok(ApiResponse::ok(report))
}

// GET /api/reports/sales
#[utoipa::path(
    get,
    path = "/api/reports/sales",
    tag = "Reports",
    params(ReportQuery),
    responses((status = 200, description = "Sales totals and daily breakdown", body = SalesReport)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn sales(
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<ApiResponse<SalesReport>, AppError> {
    let period = Period::resolve(query.from, query.to, today())?;
    let report = app_state.report_service.sales(period).await?;
    Ok(ApiResponse::ok(report))
}

// GET /api/reports/collections
#[utoipa::path(
    get,
    path = "/api/reports/collections",
    tag = "Reports",
    params(ReportQuery),
    responses((status = 200, description = "Payments collected per day", body = CollectionsReport)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn collections(
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<ApiResponse<CollectionsReport>, AppError> {
    let period = Period::resolve(query.from, query.to, today())?;
    let report = app_state.report_service.collections(period).await?;
    Ok(ApiResponse::ok(report))
}

// GET /api/reports/overdue
#[utoipa::path(
    get,
    path = "/api/reports/overdue",
    tag = "Reports",
    params(ReportQuery),
    responses((status = 200, description = "Overdue balances per customer", body = [OverdueCustomerRow])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn overdue(
    State(app_state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<ApiResponse<OverdueReport>, AppError> {
    let page = PageRequest::new(query.page, query.per_page);
    let report = app_state.report_service.overdue(today(), page).await?;
    Ok(ApiResponse::ok(report))
}
