//! Central module for application-wide configuration settings.
//!
//! This module handles loading and validating configuration parameters such as
//! the database URL, server port, token lifetimes and request deadlines.

use anyhow::{Context, Result, bail};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Minimum length of the HMAC secret used to sign tokens.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Work factor range accepted by bcrypt.
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub app_env: String,
    pub server_port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub auto_migrate: bool,
    pub jwt_secret: String,
    pub jwt_expires_in_seconds: u64,
    pub jwt_refresh_expires_in_seconds: u64,
    pub bcrypt_cost: u32,
    pub request_timeout_seconds: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let config = Config {
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "pray-together-api".to_string()),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
            server_port: env_or("SERVER_PORT", "8080")?,
            database_url,
            max_connections: env_or("DB_MAX_CONNECTIONS", "10")?,
            acquire_timeout_seconds: env_or("DB_ACQUIRE_TIMEOUT_SECONDS", "5")?,
            auto_migrate: env_or("DB_AUTO_MIGRATE", "true")?,
            jwt_secret,
            jwt_expires_in_seconds: env_or("JWT_EXPIRES_IN_SECONDS", "86400")?,
            jwt_refresh_expires_in_seconds: env_or("JWT_REFRESH_EXPIRES_IN_SECONDS", "604800")?,
            bcrypt_cost: env_or("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())?,
            request_timeout_seconds: env_or("REQUEST_TIMEOUT_SECONDS", "30")?,
            cors_allowed_origins,
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the server cannot safely start with.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.server_port == 0 {
            problems.push("SERVER_PORT must be between 1 and 65535".to_string());
        }
        if self.database_url.trim().is_empty() {
            problems.push("DATABASE_URL must not be empty".to_string());
        }
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            problems.push(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LEN
            ));
        }
        if self.jwt_expires_in_seconds == 0 {
            problems.push("JWT_EXPIRES_IN_SECONDS must be positive".to_string());
        }
        if self.jwt_refresh_expires_in_seconds <= self.jwt_expires_in_seconds {
            problems.push(
                "JWT_REFRESH_EXPIRES_IN_SECONDS must be greater than JWT_EXPIRES_IN_SECONDS"
                    .to_string(),
            );
        }
        if !BCRYPT_COST_RANGE.contains(&self.bcrypt_cost) {
            problems.push(format!(
                "BCRYPT_COST must be between {} and {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end()
            ));
        }
        if self.request_timeout_seconds == 0 {
            problems.push("REQUEST_TIMEOUT_SECONDS must be positive".to_string());
        }

        if !problems.is_empty() {
            bail!("invalid configuration: {}", problems.join(", "));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        matches!(self.app_env.as_str(), "prod" | "production")
    }

    pub fn is_development(&self) -> bool {
        matches!(self.app_env.as_str(), "local" | "dev" | "development")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Reads `key` from the environment, falling back to `default`, and parses it.
fn env_or<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .with_context(|| format!("{} must be a valid value", key))
}
