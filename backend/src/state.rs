//! Shared application state, built once at startup and read-only afterwards.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::api::build_error_registry;
use crate::config::Config;
use crate::database::Database;
use crate::errors::ErrorRegistry;
use crate::utils::jwt::{JwtManager, TokenManager};
use crate::utils::password::PasswordHasher;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub tokens: Arc<dyn TokenManager>,
    pub hasher: PasswordHasher,
    pub errors: Arc<ErrorRegistry>,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let tokens: Arc<dyn TokenManager> = Arc::new(JwtManager::from_config(&config));
        Self::with_token_manager(config, db, tokens)
    }

    /// Builds the state around a caller-supplied token manager.
    pub fn with_token_manager(
        config: Config,
        db: Database,
        tokens: Arc<dyn TokenManager>,
    ) -> Result<Self> {
        let hasher = PasswordHasher::new(config.bcrypt_cost)
            .context("failed to initialise password hasher")?;
        let errors = build_error_registry();

        tracing::debug!(
            registered_errors = errors.len(),
            bcrypt_cost = hasher.cost(),
            "Application state initialised"
        );

        Ok(AppState {
            config: Arc::new(config),
            db,
            tokens,
            hasher,
            errors: Arc::new(errors),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }
}
