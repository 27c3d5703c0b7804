// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

// Every fallible path in the crate ends here; one `IntoResponse` renders them all.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid installment schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid payment amount: {0}")]
    InvalidPaymentAmount(String),

    #[error("{0} not found")]
    ResourceNotFound(String),

    #[error("Installment is already settled")]
    AlreadySettled,

    #[error("Invoice is already cancelled")]
    AlreadyCancelled,

    #[error("Invoice is cancelled and no longer accepts payments")]
    InvoiceCancelled,

    #[error("Insufficient stock for '{product}': requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: i32,
        available: i32,
    },

    #[error("{0}")]
    Conflict(String),

    // --- Auth ---
    #[error("Authentication credentials were not provided")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid, inactive or expired API key")]
    InvalidApiKey,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    // --- Infra ---
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::ResourceNotFound(what.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::InvalidSchedule(_)
            | AppError::InvalidPaymentAmount(_) => StatusCode::BAD_REQUEST,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadySettled
            | AppError::AlreadyCancelled
            | AppError::InvoiceCancelled
            | AppError::InsufficientStock { .. }
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::MissingCredentials
            | AppError::InvalidCredentials
            | AppError::InvalidToken
            | AppError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable, machine-readable code sent next to the human message.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::InvalidSchedule(_) => "INVALID_SCHEDULE",
            AppError::InvalidPaymentAmount(_) => "INVALID_PAYMENT_AMOUNT",
            AppError::ResourceNotFound(_) => "NOT_FOUND",
            AppError::AlreadySettled => "ALREADY_SETTLED",
            AppError::AlreadyCancelled => "ALREADY_CANCELLED",
            AppError::InvoiceCancelled => "INVOICE_CANCELLED",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::Conflict(_) => "CONFLICT",
            AppError::MissingCredentials => "MISSING_CREDENTIALS",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::InvalidApiKey => "INVALID_API_KEY",
            AppError::Forbidden => "FORBIDDEN",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => "INTERNAL_ERROR",
        }
    }
}

/// Maps a unique-constraint violation to `Conflict`, anything else to `DatabaseError`.
pub fn conflict_on_unique(e: sqlx::Error, message: impl Into<String>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(message.into());
        }
    }
    e.into()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        let body = match &self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "success": false,
                    "error": "One or more fields are invalid.",
                    "error_code": code,
                    "details": details,
                })
            }
            AppError::InsufficientStock { product, requested, available } => json!({
                "success": false,
                "error": self.to_string(),
                "error_code": code,
                "details": {
                    "product": product,
                    "requested": requested,
                    "available": available,
                },
            }),
            e if status.is_server_error() => {
                // Internals stay in the log, never in the body.
                tracing::error!("Internal server error: {}", e);
                json!({
                    "success": false,
                    "error": "An unexpected error occurred.",
                    "error_code": code,
                })
            }
            e => json!({
                "success": false,
                "error": e.to_string(),
                "error_code": code,
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn conflict_errors_render_409_with_code() {
        let (status, body) = body_json(AppError::AlreadySettled).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "ALREADY_SETTLED");
    }

    #[tokio::test]
    async fn insufficient_stock_carries_details() {
        let err = AppError::InsufficientStock {
            product: "Fridge".into(),
            requested: 3,
            available: 1,
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["details"]["requested"], 3);
        assert_eq!(body["details"]["available"], 1);
    }

    #[tokio::test]
    async fn internal_errors_hide_their_cause() {
        let err = AppError::InternalServerError(anyhow::anyhow!("disk on fire"));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An unexpected error occurred.");
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "name is required"))]
        name: String,
    }

    #[tokio::test]
    async fn validation_errors_list_fields() {
        let errors = Probe { name: String::new() }.validate().unwrap_err();
        let (status, body) = body_json(AppError::ValidationError(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["name"][0], "name is required");
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(AppError::MissingCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidApiKey.error_code(), "INVALID_API_KEY");
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::InvalidPaymentAmount("too much".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
