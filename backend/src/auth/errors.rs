//! Authentication domain errors and their registered responses.

use axum::http::StatusCode;

use crate::errors::{DomainError, ErrorRegistry, ErrorResponse};

pub const MISSING_TOKEN: DomainError = DomainError::new("MISSING_TOKEN");
pub const INVALID_TOKEN: DomainError = DomainError::new("INVALID_TOKEN");
pub const EXPIRED_TOKEN: DomainError = DomainError::new("EXPIRED_TOKEN");
pub const INVALID_CLAIMS: DomainError = DomainError::new("INVALID_CLAIMS");
pub const INCORRECT_EMAIL_PASSWORD: DomainError = DomainError::new("INCORRECT_EMAIL_PASSWORD");

const PLEASE_LOG_IN: &str = "Please log in.";

pub fn register(registry: &mut ErrorRegistry) {
    // Token failures share one response so clients cannot probe which check failed.
    for error in [MISSING_TOKEN, INVALID_TOKEN, EXPIRED_TOKEN, INVALID_CLAIMS] {
        registry.register(
            error,
            ErrorResponse::new(StatusCode::UNAUTHORIZED, "AUTH-000", PLEASE_LOG_IN),
        );
    }

    registry.register(
        INCORRECT_EMAIL_PASSWORD,
        ErrorResponse::new(
            StatusCode::BAD_REQUEST,
            "AUTH-003",
            "The email or password is incorrect.",
        ),
    );
}
