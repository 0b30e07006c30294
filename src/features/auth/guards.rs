//! Role-based authorization guards.
//!
//! These guards extract the session user and verify the required role.
//! Students can report and browse; staff and faculty can additionally post
//! status updates on reports.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for operations reserved to staff and faculty.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireStaff(user): RequireStaff) { ... }
/// ```
pub struct RequireStaff(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.can_update_reports() {
            return Err(AppError::Forbidden(
                "Staff or faculty access required".to_string(),
            ));
        }

        Ok(RequireStaff(user.clone()))
    }
}
