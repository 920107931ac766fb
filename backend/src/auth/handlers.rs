//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse and validate incoming requests, delegate to
//! [`AuthService`] and render failures through the error registry.

use crate::api::common::ValidatedJson;
use crate::auth::models::{LoginRequest, LoginResponse, SignupRequest};
use crate::auth::service::AuthService;
use crate::errors::ErrorResponse;
use crate::state::AppState;
use crate::utils::context::RequestContext;
use axum::{extract::Extension, http::StatusCode, response::Json};

/// Handle member signup request
#[axum::debug_handler]
pub async fn signup(
    Extension(state): Extension<AppState>,
    Extension(ctx): Extension<RequestContext>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<StatusCode, ErrorResponse> {
    let auth_service = AuthService::new(state.pool(), state.tokens.as_ref(), &state.hasher);

    match auth_service.signup(&ctx, payload).await {
        Ok(()) => Ok(StatusCode::CREATED),
        Err(error) => Err(state.errors.respond(&ctx, &error)),
    }
}

/// Handle member login request
#[axum::debug_handler]
pub async fn login(
    Extension(state): Extension<AppState>,
    Extension(ctx): Extension<RequestContext>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ErrorResponse> {
    let auth_service = AuthService::new(state.pool(), state.tokens.as_ref(), &state.hasher);

    match auth_service.login(&ctx, payload).await {
        Ok(response) => Ok(Json(response)),
        Err(error) => Err(state.errors.respond(&ctx, &error)),
    }
}
