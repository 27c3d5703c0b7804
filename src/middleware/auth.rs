// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{common::error::AppError, config::AppState, models::auth::User};

pub const API_KEY_HEADER: &str = "x-api-key";

/// How a request claims to be authenticated.
#[derive(Debug, PartialEq, Eq)]
pub enum Credentials {
    ApiKey(String),
    Bearer(String),
}

/// Reads credentials from the headers without touching the database.
/// An API key wins over a bearer token when both are sent.
pub fn extract_credentials(headers: &HeaderMap) -> Result<Credentials, AppError> {
    if let Some(value) = headers.get(API_KEY_HEADER) {
        let key = value.to_str().map_err(|_| AppError::InvalidApiKey)?.trim();
        if key.is_empty() {
            return Err(AppError::InvalidApiKey);
        }
        return Ok(Credentials::ApiKey(key.to_string()));
    }

    if headers.contains_key(axum::http::header::AUTHORIZATION) {
        let Authorization(bearer) = headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or(AppError::InvalidToken)?;
        return Ok(Credentials::Bearer(bearer.token().to_string()));
    }

    Err(AppError::MissingCredentials)
}

// Resolves the caller and stores the `User` in the request extensions
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match extract_credentials(request.headers())? {
        Credentials::ApiKey(key) => app_state.auth_service.validate_api_key(&key).await?,
        Credentials::Bearer(token) => app_state.auth_service.validate_token(&token).await?,
    };

    tracing::debug!(user_id = %user.id, "Request authenticated");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Extractor for the authenticated user inside handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn no_headers_means_missing_credentials() {
        let result = extract_credentials(&HeaderMap::new());
        assert!(matches!(result, Err(AppError::MissingCredentials)));
    }

    #[test]
    fn bearer_token_is_read() {
        let result = extract_credentials(&headers(&[("authorization", "Bearer abc.def.ghi")])).unwrap();
        assert_eq!(result, Credentials::Bearer("abc.def.ghi".into()));
    }

    #[test]
    fn malformed_authorization_is_an_invalid_token() {
        let result = extract_credentials(&headers(&[("authorization", "Basic dXNlcjpwdw==")]));
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn api_key_takes_precedence() {
        let result = extract_credentials(&headers(&[
            ("x-api-key", "tq_123"),
            ("authorization", "Bearer abc"),
        ]))
        .unwrap();
        assert_eq!(result, Credentials::ApiKey("tq_123".into()));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let result = extract_credentials(&headers(&[("x-api-key", "  ")]));
        assert!(matches!(result, Err(AppError::InvalidApiKey)));
    }
}
