use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::auth::jwt::{validate_token, JwtError, TokenType};
use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated caller, taken from `Authorization: Bearer <access token>`.
///
/// Every owner-scoped operation receives `user_id` from here and nowhere else.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication credentials were not provided".to_string())
            })?;

        let token = header_value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Expected a Bearer token".to_string()))?;

        let claims = validate_token(token, &state.config.jwt_secret, TokenType::Access)
            .map_err(|e| match e {
                JwtError::Expired => AppError::Unauthorized("Token has expired".to_string()),
                _ => AppError::Unauthorized("Token is invalid".to_string()),
            })?;

        // Tokens outlive accounts; rows may only be written for existing users.
        let user = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(AuthUser { user_id: user.id })
    }
}
