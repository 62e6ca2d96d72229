//! Caller-identity extractor for Axum handlers.
//!
//! Token validation is owned by the upstream auth collaborator (gateway or
//! edge middleware), which forwards the resolved user id in the
//! `x-user-id` header. This extractor is the seam where a real token
//! validator would plug in.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use brandkit_core::types::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// The header carrying the externally validated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user for the current request.
///
/// Use this as an extractor parameter in any handler that requires a
/// caller identity:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(format!("Missing {USER_ID_HEADER} header"))
            })?;

        let user_id: UserId = raw.parse().map_err(|_| {
            AppError::Unauthorized(format!("{USER_ID_HEADER} header is not a valid UUID"))
        })?;

        Ok(AuthUser { user_id })
    }
}
