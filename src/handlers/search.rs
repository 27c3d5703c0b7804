// src/handlers/search.rs

use axum::extract::{Query, State};

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    models::search::{SearchQuery, SearchResults},
};

// GET /api/search?q=
#[utoipa::path(
    get,
    path = "/api/search",
    tag = "Search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Up to ten products, customers and invoices each", body = SearchResults),
        (status = 400, description = "Term shorter than two characters")
    ),
    security(("api_jwt" = []), ("api_key" = []))
)]
pub async fn search(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<SearchResults>, AppError> {
    let results = app_state.search_service.search(&query).await?;
    Ok(ApiResponse::ok(results))
}
