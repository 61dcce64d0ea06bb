use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::services::AuthContext;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. The token is
/// only verified here; issuing tokens is the identity provider's job.
pub struct AuthUser {
    pub user_id: i32,
}

impl AuthUser {
    /// The explicit identity value handed to the services.
    pub fn context(&self) -> AuthContext {
        AuthContext {
            user_id: self.user_id,
        }
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
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected bearer token: {e}");
            AppError::TokenInvalid
        })?;

        Ok(AuthUser {
            user_id: claims.uid,
        })
    }
}
