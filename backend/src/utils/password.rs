//! Password hashing with bcrypt.

use std::sync::Arc;

use bcrypt::BcryptError;

use crate::errors::{ServiceError, ServiceResult};

/// Hashes and verifies member passwords.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    // Verified against when the account does not exist, so both login
    // failures cost one bcrypt comparison.
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, BcryptError> {
        let dummy_hash = bcrypt::hash("dummy-password-for-timing", cost)?;
        Ok(Self {
            cost,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, BcryptError> {
        bcrypt::hash(password, self.cost)
    }

    /// Returns `false` for a wrong password and for a malformed hash.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }

    /// Burns one verification against the dummy hash. Always `false`.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_hash);
        false
    }

    /// Hashes on the blocking pool.
    pub async fn hash_async(&self, password: &str) -> ServiceResult<String> {
        let hasher = self.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::internal_error(format!("hash task failed: {}", e)))?
            .map_err(ServiceError::PasswordHashing)
    }

    /// Verifies on the blocking pool. A `None` hash runs the dummy comparison.
    pub async fn verify_async(&self, password: &str, hash: Option<&str>) -> ServiceResult<bool> {
        let hasher = self.clone();
        let password = password.to_string();
        let hash = hash.map(str::to_string);
        tokio::task::spawn_blocking(move || match hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => hasher.verify_dummy(&password),
        })
        .await
        .map_err(|e| ServiceError::internal_error(format!("verify task failed: {}", e)))
    }
}
