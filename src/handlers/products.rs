// src/handlers/products.rs

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
    middleware::{auth::AuthenticatedUser, rbac::AdminGuard},
    models::product::{CreateProductPayload, Product, ProductQuery, UpdateProductPayload},
};

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses((status = 201, description = "Product created", body = Product)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateProductPayload>,
) -> Result<ApiResponse<Product>, AppError> {
    payload.validate()?;
    let product = app_state.product_service.create_product(&user.0, &payload).await?;
    Ok(ApiResponse::created(product))
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductQuery),
    responses((status = 200, description = "One page of products", body = [Product])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<ApiResponse<Page<Product>>, AppError> {
    let page = PageRequest::new(query.page, query.per_page);
    let products = app_state.product_service.list_products(&query, page).await?;
    Ok(ApiResponse::ok(products))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Not found")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Product>, AppError> {
    let product = app_state.product_service.get_product(id).await?;
    Ok(ApiResponse::ok(product))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses((status = 200, description = "Product updated", body = Product)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<ApiResponse<Product>, AppError> {
    payload.validate()?;
    let product = app_state.product_service.update_product(&user.0, id, &payload).await?;
    Ok(ApiResponse::ok(product))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses((status = 200, description = "Product deleted")),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    app_state.product_service.delete_product(&user.0, id).await?;
    Ok(ApiResponse::message("Product deleted."))
}
