//! JWT token utilities for authentication.
//!
//! Provides token creation, validation, and claims management for member
//! authentication. Two kinds of token are issued per login: a short-lived
//! access token and a longer-lived refresh token.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// Discriminates access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT Claims structure carried by every issued token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Member ID
    pub sub: String,
    pub email: String,
    pub token_type: TokenType,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    pub fn member_id(&self) -> &str {
        &self.sub
    }

    pub fn is_access(&self) -> bool {
        self.token_type == TokenType::Access
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is invalid")]
    Invalid,

    #[error("token has expired")]
    Expired,

    #[error("token claims are invalid")]
    InvalidClaims,

    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => TokenError::InvalidClaims,
            _ => TokenError::Invalid,
        }
    }
}

/// Issues and validates signed tokens.
pub trait TokenManager: Send + Sync {
    fn issue_access_token(&self, member_id: &str, email: &str) -> Result<String, TokenError>;

    fn issue_refresh_token(&self, member_id: &str, email: &str) -> Result<String, TokenError>;

    fn validate(&self, token: &str) -> Result<Claims, TokenError>;
}

/// HS256 token manager backed by a shared secret
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtManager {
    pub fn new(
        secret: &str,
        issuer: impl Into<String>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        JwtManager {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Create a JwtManager from application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            config.app_name.clone(),
            Duration::seconds(config.jwt_expires_in_seconds as i64),
            Duration::seconds(config.jwt_refresh_expires_in_seconds as i64),
        )
    }

    fn issue(
        &self,
        member_id: &str,
        email: &str,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: member_id.to_string(),
            email: email.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }
}

impl TokenManager for JwtManager {
    fn issue_access_token(&self, member_id: &str, email: &str) -> Result<String, TokenError> {
        self.issue(member_id, email, TokenType::Access, self.access_ttl)
    }

    fn issue_refresh_token(&self, member_id: &str, email: &str) -> Result<String, TokenError> {
        self.issue(member_id, email, TokenType::Refresh, self.refresh_ttl)
    }

    fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(TokenError::from)
    }
}
