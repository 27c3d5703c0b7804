// src/handlers/customers.rs

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
    middleware::rbac::AdminGuard,
    models::customer::{
        CreateCustomerPayload, Customer, CustomerDetail, CustomerQuery, UpdateCustomerPayload,
    },
};

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 409, description = "Phone number already registered")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<ApiResponse<Customer>, AppError> {
    payload.validate()?;
    let customer = app_state.customer_service.create_customer(&payload).await?;
    Ok(ApiResponse::created(customer))
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(CustomerQuery),
    responses((status = 200, description = "One page of customers", body = [Customer])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    Query(query): Query<CustomerQuery>,
) -> Result<ApiResponse<Page<Customer>>, AppError> {
    let page = PageRequest::new(query.page, query.per_page);
    let customers = app_state.customer_service.list_customers(&query, page).await?;
    Ok(ApiResponse::ok(customers))
}

// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses((status = 200, description = "Customer with outstanding balance", body = CustomerDetail)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<CustomerDetail>, AppError> {
    let customer = app_state.customer_service.get_customer(id).await?;
    Ok(ApiResponse::ok(customer))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    request_body = UpdateCustomerPayload,
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses((status = 200, description = "Customer updated", body = Customer)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<ApiResponse<Customer>, AppError> {
    payload.validate()?;
    let customer = app_state.customer_service.update_customer(id, &payload).await?;
    Ok(ApiResponse::ok(customer))
}

// DELETE /api/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted"),
        (status = 409, description = "Customer has invoices")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    app_state.customer_service.delete_customer(id).await?;
    Ok(ApiResponse::message("Customer deleted."))
}
