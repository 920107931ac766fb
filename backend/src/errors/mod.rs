//! Application error types and the domain error registry.
//!
//! Any layer can raise a named [`DomainError`]; the outermost layer asks the
//! [`ErrorRegistry`] how to render it. The registry is built once at startup and
//! is read-only afterwards, so the place an error is raised stays decoupled from
//! the place it is turned into an HTTP response.
//!
//! # Response Format
//! Every failure is rendered as the same JSON envelope:
//! - `status`: HTTP status code
//! - `code`: stable machine-readable code for client-side branching
//! - `message`: human-readable message

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::context::RequestContext;
use crate::utils::jwt::TokenError;

/// A named failure condition, identified by a stable `errInfo` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainError {
    info: &'static str,
}

impl DomainError {
    pub const fn new(info: &'static str) -> Self {
        Self { info }
    }

    /// The registry key for this error.
    pub const fn info(&self) -> &'static str {
        self.info
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info)
    }
}

impl StdError for DomainError {}

/// Wire envelope for every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// The request payload failed validation.
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "ERROR-001", message)
    }

    /// The request body could not be parsed.
    pub fn invalid_request() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "ERROR-002",
            "The request format is invalid.",
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "ERROR-003",
            "An internal server error occurred.",
        )
    }

    pub fn request_timeout() -> Self {
        Self::new(
            StatusCode::REQUEST_TIMEOUT,
            "ERROR-004",
            "The request took too long to process.",
        )
    }

    /// Fallback for authentication failures that have no registered response.
    pub fn authentication_failed() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "AUTH-999", "Authentication failed.")
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Maps domain error identifiers to their wire responses.
#[derive(Debug, Default)]
pub struct ErrorRegistry {
    responses: HashMap<&'static str, ErrorResponse>,
}

impl ErrorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the response for `error`. Registering the same response twice is a no-op.
    pub fn register(&mut self, error: DomainError, response: ErrorResponse) {
        match self.responses.get(error.info()) {
            Some(existing) if *existing == response => {}
            Some(existing) => {
                tracing::warn!(
                    err_info = error.info(),
                    previous_code = %existing.code,
                    code = %response.code,
                    "Replacing registered domain error response"
                );
                self.responses.insert(error.info(), response);
            }
            None => {
                self.responses.insert(error.info(), response);
            }
        }
    }

    /// Walks the error chain for a [`DomainError`] and returns its registered response.
    pub fn resolve(&self, err: &(dyn StdError + 'static)) -> Option<&ErrorResponse> {
        std::iter::successors(Some(err), |&current| current.source())
            .find_map(|current| current.downcast_ref::<DomainError>())
            .and_then(|domain| self.responses.get(domain.info()))
    }

    /// Renders a service failure, falling back to the generic internal error.
    pub fn respond(&self, ctx: &RequestContext, err: &ServiceError) -> ErrorResponse {
        match self.resolve(err) {
            Some(response) => {
                tracing::warn!(
                    parent: ctx.span(),
                    error = %error_chain(err),
                    code = %response.code,
                    status = response.status,
                    "Request failed with domain error"
                );
                response.clone()
            }
            None => {
                tracing::error!(
                    parent: ctx.span(),
                    error = %error_chain(err),
                    "Request failed with unexpected error"
                );
                ErrorResponse::internal()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }
}

/// Formats an error and all of its sources as `outer: inner: root`.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    std::iter::successors(Some(err), |&current| current.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

/// Generic service error shared by all services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Database error")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    #[error("Token issuance failed")]
    TokenIssuance(#[source] TokenError),

    #[error("Password hashing failed")]
    PasswordHashing(#[source] bcrypt::BcryptError),

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// The domain error carried by this failure, if any.
    #[cfg(test)]
    pub fn domain(&self) -> Option<DomainError> {
        match self {
            Self::Domain(domain) => Some(*domain),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    const TEST_MISSING: DomainError = DomainError::new("TEST_MISSING");
    const TEST_UNREGISTERED: DomainError = DomainError::new("TEST_UNREGISTERED");

    fn registry() -> ErrorRegistry {
        let mut registry = ErrorRegistry::new();
        registry.register(
            TEST_MISSING,
            ErrorResponse::new(StatusCode::NOT_FOUND, "TEST-001", "missing"),
        );
        registry
    }

    #[test]
    fn test_resolve_registered_domain_error() {
        let registry = registry();
        let err = ServiceError::from(TEST_MISSING);

        let response = registry.resolve(&err).unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(response.code, "TEST-001");
    }

    #[test]
    fn test_resolve_unregistered_domain_error() {
        let registry = registry();
        let err = ServiceError::from(TEST_UNREGISTERED);

        assert!(registry.resolve(&err).is_none());
    }

    #[test]
    fn test_resolve_non_domain_error() {
        let registry = registry();
        let err = ServiceError::from(anyhow::anyhow!("connection reset"));

        assert!(registry.resolve(&err).is_none());
    }

    #[test]
    fn test_resolve_walks_wrapped_chain() {
        let registry = registry();
        let wrapped: anyhow::Result<()> = Err(TEST_MISSING).context("load member");
        let err = ServiceError::from(wrapped.unwrap_err());

        let response = registry.resolve(&err).unwrap();
        assert_eq!(response.code, "TEST-001");
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = registry();
        registry.register(
            TEST_MISSING,
            ErrorResponse::new(StatusCode::NOT_FOUND, "TEST-001", "missing"),
        );

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_respond_never_leaks_internal_detail() {
        let registry = registry();
        let ctx = RequestContext::detached();
        let err = ServiceError::from(anyhow::anyhow!("password=hunter2 in query"));

        let response = registry.respond(&ctx, &err);
        assert_eq!(response, ErrorResponse::internal());
        assert!(!response.message.contains("hunter2"));
    }

    #[test]
    fn test_error_chain_formatting() {
        let wrapped: anyhow::Result<()> = Err(anyhow::anyhow!("disk full")).context("insert member");
        let err = ServiceError::from(wrapped.unwrap_err());

        assert_eq!(err.to_string(), "Database error");
        assert_eq!(error_chain(&err), "Database error: insert member: disk full");
    }
}
