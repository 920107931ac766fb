//! Member domain errors and their registered responses.

use axum::http::StatusCode;

use crate::errors::{DomainError, ErrorRegistry, ErrorResponse};

pub const MEMBER_NOT_FOUND: DomainError = DomainError::new("MEMBER_NOT_FOUND");
pub const MEMBER_ALREADY_EXISTS: DomainError = DomainError::new("MEMBER_ALREADY_EXISTS");

pub fn register(registry: &mut ErrorRegistry) {
    registry.register(
        MEMBER_NOT_FOUND,
        ErrorResponse::new(
            StatusCode::NOT_FOUND,
            "MEMBER-001",
            "The member could not be found.",
        ),
    );
    registry.register(
        MEMBER_ALREADY_EXISTS,
        ErrorResponse::new(
            StatusCode::CONFLICT,
            "MEMBER-002",
            "This email is already registered.",
        ),
    );
}
