use anyhow::Context;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::auth::jwt::{self, TokenPair, TokenType};
use crate::auth::password;
use crate::errors::{field_errors, AppError};
use crate::models::user::{NewUser, UserProfile};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "No active account found with the given credentials";

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserProfile,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

fn valid_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

/// POST /register/
pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(mut req) = payload?;
    req.username = req.username.trim().to_string();
    req.email = req
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    let mut errors = req
        .validate()
        .err()
        .map(|e| field_errors(&e))
        .unwrap_or_default();
    if req.username.is_empty() {
        errors
            .entry("username".to_string())
            .or_default()
            .push("This field may not be blank.".to_string());
    } else if !req.username.chars().all(valid_username_char) {
        errors.entry("username".to_string()).or_default().push(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        );
    }
    if let Err(message) = password::validate_password_strength(&req.password) {
        errors.entry("password".to_string()).or_default().push(message);
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let password_hash =
        password::hash_password(&req.password).context("Failed to hash password")?;

    let user = state
        .users
        .create_user(NewUser {
            username: req.username,
            email: req.email.unwrap_or_default(),
            password_hash,
        })
        .await?
        .ok_or_else(|| {
            AppError::field("username", "A user with that username already exists.")
        })?;

    let tokens = jwt::issue_pair(user.id, &state.config).context("Failed to issue tokens")?;
    info!("Registered user {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserProfile::from(&user),
            tokens,
        }),
    ))
}

/// POST /login/
pub async fn handle_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenPair>, AppError> {
    let Json(req) = payload?;

    let user = state
        .users
        .find_by_username(req.username.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)
        .context("Stored password hash is unreadable")?;
    if !valid {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let tokens = jwt::issue_pair(user.id, &state.config).context("Failed to issue tokens")?;
    info!("User {} logged in", user.id);
    Ok(Json(tokens))
}

/// POST /token/refresh/
pub async fn handle_refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<RefreshResponse>, AppError> {
    let Json(req) = payload?;

    let claims = jwt::validate_token(&req.refresh, &state.config.jwt_secret, TokenType::Refresh)
        .map_err(|_| AppError::Unauthorized("Token is invalid or expired".to_string()))?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    let access = jwt::issue(user.id, TokenType::Access, &state.config)
        .context("Failed to issue access token")?;
    Ok(Json(RefreshResponse { access }))
}
