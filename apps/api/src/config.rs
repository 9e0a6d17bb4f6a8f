use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret: require_env("JWT_SECRET")?,
            access_token_ttl_minutes: parse_env("ACCESS_TOKEN_TTL_MINUTES", 60)?,
            refresh_token_ttl_days: parse_env("REFRESH_TOKEN_TTL_DAYS", 1)?,
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests; never touches the environment.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://unused".to_string(),
            database_max_connections: 1,
            jwt_secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            access_token_ttl_minutes: 5,
            refresh_token_ttl_days: 1,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: u16 = parse_env("RESUME_API_TEST_UNSET_PORT", 8000).unwrap();
        assert_eq!(value, 8000);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("RESUME_API_TEST_BAD_TTL", "soon");
        let result: Result<i64> = parse_env("RESUME_API_TEST_BAD_TTL", 60);
        assert!(result.is_err());
        std::env::remove_var("RESUME_API_TEST_BAD_TTL");
    }
}
