//! Fixtures shared by the unit tests.

use std::path::PathBuf;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use uuid::Uuid;

use crate::config::Config;
use crate::database::Database;
use crate::state::AppState;
use crate::utils::jwt::{Claims, TokenError, TokenManager};

pub fn test_config() -> Config {
    Config {
        app_name: "pray-together-test".to_string(),
        app_env: "test".to_string(),
        server_port: 8080,
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
        acquire_timeout_seconds: 5,
        auto_migrate: true,
        jwt_secret: "test-secret-that-is-at-least-32-characters".to_string(),
        jwt_expires_in_seconds: 900,
        jwt_refresh_expires_in_seconds: 3600,
        bcrypt_cost: 4,
        request_timeout_seconds: 30,
        cors_allowed_origins: vec!["*".to_string()],
    }
}

/// In-memory database with migrations applied.
///
/// Every SQLite memory connection is its own database, so the pool is pinned
/// to a single connection that never expires.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// File-backed database with several connections, for tests where separate
/// connections must contend for the write lock. The caller removes the file.
pub async fn test_file_pool() -> (SqlitePool, PathBuf) {
    let path = std::env::temp_dir().join(format!("pray-together-{}.db", Uuid::now_v7()));
    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    (pool, path)
}

pub async fn test_database() -> Database {
    Database::from_pool(test_pool().await)
}

pub async fn test_state() -> AppState {
    AppState::new(test_config(), test_database().await).unwrap()
}

pub async fn test_state_with_tokens(tokens: Arc<dyn TokenManager>) -> AppState {
    AppState::with_token_manager(test_config(), test_database().await, tokens).unwrap()
}

/// Token manager double that refuses to sign anything.
pub struct MockTokenManager;

impl MockTokenManager {
    pub fn failing() -> Self {
        MockTokenManager
    }
}

impl TokenManager for MockTokenManager {
    fn issue_access_token(&self, _member_id: &str, _email: &str) -> Result<String, TokenError> {
        Err(TokenError::Signing(ErrorKind::InvalidKeyFormat.into()))
    }

    fn issue_refresh_token(&self, _member_id: &str, _email: &str) -> Result<String, TokenError> {
        Err(TokenError::Signing(ErrorKind::InvalidKeyFormat.into()))
    }

    fn validate(&self, _token: &str) -> Result<Claims, TokenError> {
        Err(TokenError::Invalid)
    }
}
