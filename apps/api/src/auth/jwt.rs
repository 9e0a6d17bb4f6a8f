//! HS256 access/refresh tokens.
//!
//! Claims carry the user id as `sub` plus a `token_type`, so a refresh
//! token can never be replayed as an access token.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;

const ISSUER: &str = "resume-api";

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    Create(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Expected {expected} token, got {actual}")]
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }

    fn lifetime(&self, config: &Config) -> Duration {
        match self {
            TokenType::Access => Duration::minutes(config.access_token_ttl_minutes),
            TokenType::Refresh => Duration::days(config.refresh_token_ttl_days),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub token_type: TokenType,
}

impl Claims {
    pub fn new(user_id: Uuid, token_type: TokenType, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            token_type,
        }
    }
}

/// Access/refresh pair handed out on registration and login.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::Create(e.to_string()))
}

pub fn issue(user_id: Uuid, token_type: TokenType, config: &Config) -> Result<String, JwtError> {
    let claims = Claims::new(user_id, token_type, token_type.lifetime(config));
    create_token(&claims, &config.jwt_secret)
}

pub fn issue_pair(user_id: Uuid, config: &Config) -> Result<TokenPair, JwtError> {
    Ok(TokenPair {
        access: issue(user_id, TokenType::Access, config)?,
        refresh: issue(user_id, TokenType::Refresh, config)?,
    })
}

/// Verifies signature, issuer, `exp`/`nbf` and the expected token type.
pub fn validate_token(token: &str, secret: &str, expected: TokenType) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_nbf = true;
    validation.leeway = 0;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })?;

    if data.claims.token_type != expected {
        return Err(JwtError::WrongType {
            expected: expected.as_str(),
            actual: data.claims.token_type.as_str(),
        });
    }

    Ok(data.claims)
}
