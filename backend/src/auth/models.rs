//! Data structures for authentication requests and responses.
//!
//! Request fields default to empty so a missing field is reported by
//! validation rather than by the JSON parser.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^01[0-9]-?[0-9]{4}-?[0-9]{4}$").expect("phone number pattern is valid")
});

fn validate_phone_number(phone_number: &str) -> Result<(), ValidationError> {
    if !PHONE_NUMBER.is_match(phone_number) {
        return Err(ValidationError::new("phone")
            .with_message("Phone number must look like 010-1234-5678".into()));
    }
    Ok(())
}

/// Signup request payload
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 20, message = "Name must be between 1-20 characters"))]
    pub name: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 50, message = "Email must be at most 50 characters")
    )]
    pub email: String,

    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,

    #[validate(length(min = 8, max = 15, message = "Password must be between 8-15 characters"))]
    pub password: String,
}

/// Login request payload
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(email(message = "Must be a valid email"))]
    pub email: String,

    #[validate(length(min = 8, max = 15, message = "Password must be between 8-15 characters"))]
    pub password: String,
}

/// Login response containing both tokens
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}
