// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

/// A named set of roles allowed through a `RequireRole` guard.
pub trait RoleSet: Send + Sync + 'static {
    const ALLOWED: &'static [UserRole];

    fn allows(role: UserRole) -> bool {
        Self::ALLOWED.contains(&role)
    }
}

pub struct AdminOnly;

impl RoleSet for AdminOnly {
    const ALLOWED: &'static [UserRole] = &[UserRole::Admin];
}

/// Rejects the request with `Forbidden` unless the caller's role is in `R`.
/// Runs after `auth_guard`, which put the `User` in the extensions.
pub struct RequireRole<R>(pub PhantomData<R>);

impl<R, S> FromRequestParts<S> for RequireRole<R>
where
    R: RoleSet,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::MissingCredentials)?;

        if !R::allows(user.role) {
            tracing::warn!(user_id = %user.id, role = ?user.role, "Role not allowed for this action");
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole(PhantomData))
    }
}

pub type AdminGuard = RequireRole<AdminOnly>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_only_rejects_staff() {
        assert!(AdminOnly::allows(UserRole::Admin));
        assert!(!AdminOnly::allows(UserRole::Cashier));
        assert!(!AdminOnly::allows(UserRole::Sales));
    }
}
