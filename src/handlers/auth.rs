// src/handlers/auth.rs

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::AdminGuard},
    models::auth::{
        ApiKeySummary, AuthResponse, CreateApiKeyPayload, CreateUserPayload, CreatedApiKey,
        LoginUserPayload, UpdateUserPayload, User,
    },
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Wrong e-mail or password")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    payload.validate()?;

    let auth = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(ApiResponse::ok(auth))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses((status = 200, description = "Current user", body = User)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn get_me(user: AuthenticatedUser) -> ApiResponse<User> {
    ApiResponse::ok(user.0)
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses((status = 200, description = "Staff accounts", body = [User])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
) -> Result<ApiResponse<Vec<User>>, AppError> {
    let users = app_state.auth_service.list_users().await?;
    Ok(ApiResponse::ok(users))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 409, description = "E-mail already in use")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    actor: AuthenticatedUser,
    Json(payload): Json<CreateUserPayload>,
) -> Result<ApiResponse<User>, AppError> {
    payload.validate()?;
    let user = app_state.auth_service.create_user(&actor.0, &payload).await?;
    Ok(ApiResponse::created(user))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, description = "User updated", body = User)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    actor: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<ApiResponse<User>, AppError> {
    payload.validate()?;
    let user = app_state.auth_service.update_user(&actor.0, id, &payload).await?;
    Ok(ApiResponse::ok(user))
}

// POST /api/api-keys
#[utoipa::path(
    post,
    path = "/api/api-keys",
    tag = "API keys",
    request_body = CreateApiKeyPayload,
    responses((status = 201, description = "Key created; the full key is only shown here", body = CreatedApiKey)),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn create_api_key(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    user: AuthenticatedUser,
    Json(payload): Json<CreateApiKeyPayload>,
) -> Result<ApiResponse<CreatedApiKey>, AppError> {
    payload.validate()?;
    let created = app_state.auth_service.create_api_key(&user.0, &payload).await?;
    Ok(ApiResponse::created(created).with_message("Store this key now, it will not be shown again."))
}

// GET /api/api-keys
#[utoipa::path(
    get,
    path = "/api/api-keys",
    tag = "API keys",
    responses((status = 200, description = "Keys with a preview only", body = [ApiKeySummary])),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn list_api_keys(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
) -> Result<ApiResponse<Vec<ApiKeySummary>>, AppError> {
    let keys = app_state.auth_service.list_api_keys().await?;
    Ok(ApiResponse::ok(keys))
}

// DELETE /api/api-keys/{id}
#[utoipa::path(
    delete,
    path = "/api/api-keys/{id}",
    tag = "API keys",
    params(("id" = Uuid, Path, description = "API key ID")),
    responses((status = 200, description = "Key revoked")),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn revoke_api_key(
    State(app_state): State<AppState>,
    _admin: AdminGuard,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, AppError> {
    app_state.auth_service.revoke_api_key(id).await?;
    Ok(ApiResponse::message("API key revoked."))
}
