//! Request extraction helpers shared by all handlers.
//!
//! Provides a JSON extractor that validates the payload before the handler
//! runs, plus the helpers that turn `validator` output into the error envelope.
//!
//! # Error Handling Flow
//! 1. Body that is not valid JSON for the target type → `ERROR-002`
//! 2. Parsed body that fails validation → `ERROR-001` naming the first failing field
//! 3. Otherwise the handler receives the validated value

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::{Serialize, de::DeserializeOwned};
use validator::{Validate, ValidationErrors};

use crate::errors::ErrorResponse;

/// Field-specific validation error details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flattens validation errors into one entry per failure, ordered by field name.
pub fn validation_errors_to_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string()),
            })
        })
        .collect();

    field_errors.sort_by(|a, b| a.field.cmp(&b.field));
    field_errors
}

/// Builds the `ERROR-001` envelope from the first failing field.
pub fn validation_error_response(errors: &ValidationErrors) -> ErrorResponse {
    let message = validation_errors_to_field_errors(errors)
        .into_iter()
        .next()
        .map(|error| format!("{}: {}", error.field, error.message))
        .unwrap_or_else(|| "The request is invalid.".to_string());

    ErrorResponse::validation_failed(message)
}

/// JSON body extractor that also runs `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Rejected unparseable request body");
                ErrorResponse::invalid_request()
            })?;

        value.validate().map_err(|errors| {
            tracing::debug!(error = %errors, "Rejected invalid request body");
            validation_error_response(&errors)
        })?;

        Ok(ValidatedJson(value))
    }
}
