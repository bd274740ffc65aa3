//! Role-based authorization guards.
//!
//! Roles (from highest to lowest):
//! - admin: every team's files, every operation
//! - manager: delete and reassign files of their own team, trigger rescans
//! - member: read and edit files of their own team

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for operations reserved to managers and admins.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireManager(user): RequireManager) { ... }
/// ```
pub struct RequireManager(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireManager
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.has_manager_access() {
            return Err(AppError::Forbidden(
                "Manager access required".to_string(),
            ));
        }

        Ok(RequireManager(user.clone()))
    }
}
