// src/handlers/categories.rs

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
    models::category::{
        Category, CategoryQuery, CategorySummary, CreateCategoryPayload, DeleteCategoryQuery,
        UpdateCategoryPayload,
    },
};

// POST /api/categories
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 404, description = "Parent category not found")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<ApiResponse<Category>, AppError> {
    payload.validate()?;
    let category = app_state.category_service.create_category(&user.0, &payload).await?;
    Ok(ApiResponse::created(category))
}

// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    params(CategoryQuery),
    responses((status = 200, description = "One page of categories with product counts", body = [CategorySummary])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<ApiResponse<Page<CategorySummary>>, AppError> {
    let page = PageRequest::new(query.page, query.per_page);
    let categories = app_state.category_service.list_categories(&query, page).await?;
    Ok(ApiResponse::ok(categories))
}

// GET /api/categories/{id}
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = CategorySummary),
        (status = 404, description = "Not found")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn get_category(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<CategorySummary>, AppError> {
    let category = app_state.category_service.get_category(id).await?;
    Ok(ApiResponse::ok(category))
}

// PUT /api/categories/{id}
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Categories",
    request_body = UpdateCategoryPayload,
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Parent would create a cycle")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> Result<ApiResponse<Category>, AppError> {
    payload.validate()?;
    let category = app_state
        .category_service
        .update_category(&user.0, id, &payload)
        .await?;
    Ok(ApiResponse::ok(category))
}

// DELETE /api/categories/{id}
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "Category ID"), DeleteCategoryQuery),
    responses((status = 200, description = "Category deleted; its products moved or uncategorized")),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteCategoryQuery>,
) -> Result<ApiResponse<()>, AppError> {
    let moved = app_state
        .category_service
        .delete_category(&user.0, id, query.move_to)
        .await?;
    Ok(ApiResponse::message(format!(
        "Category deleted, {} product(s) reassigned.",
        moved
    )))
}
