//! Session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fixio_core::account::{Account, Session};
use fixio_core::error::CoreError;
use fixio_core::types::DbId;

use crate::auth::jwt::session_from_token;
use crate::error::AppError;
use crate::state::AppState;

/// The signed-in caller, taken from a `Bearer` session token.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.user_id(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub session: Session,
}

impl AuthUser {
    pub fn user_id(&self) -> DbId {
        self.session.user_id()
    }

    pub fn account(&self) -> &Account {
        &self.session.account
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let session = session_from_token(token, &state.config.jwt).map_err(|err| {
            tracing::debug!(error = %err, "Rejected session token");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser { session })
    }
}
