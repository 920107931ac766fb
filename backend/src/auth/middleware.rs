//! Middleware for protecting authenticated routes.
//!
//! Validates the bearer access token and attaches the caller's identity to the
//! [`RequestContext`]. Failures short-circuit with the registered response.

use std::net::SocketAddr;

use axum::{
    Extension,
    extract::{ConnectInfo, Request},
    http::{HeaderMap, header::AUTHORIZATION, header::USER_AGENT},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::errors::{EXPIRED_TOKEN, INVALID_CLAIMS, INVALID_TOKEN, MISSING_TOKEN};
use crate::errors::{DomainError, ErrorResponse};
use crate::state::AppState;
use crate::utils::context::{AuthMember, RequestContext};
use crate::utils::jwt::{TokenError, TokenManager};

const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug)]
struct AuthFailure {
    step: &'static str,
    error: DomainError,
    detail: String,
}

impl AuthFailure {
    fn new(step: &'static str, error: DomainError, detail: impl Into<String>) -> Self {
        Self {
            step,
            error,
            detail: detail.into(),
        }
    }
}

/// JWT authentication middleware
pub async fn jwt_auth(
    Extension(state): Extension<AppState>,
    Extension(ctx): Extension<RequestContext>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(state.tokens.as_ref(), request.headers()) {
        Ok(member) => {
            request.extensions_mut().insert(ctx.with_member(member));
            next.run(request).await
        }
        Err(failure) => {
            let client_addr = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.to_string())
                .unwrap_or_default();
            let user_agent = request
                .headers()
                .get(USER_AGENT)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();

            tracing::warn!(
                parent: ctx.span(),
                step = failure.step,
                err_info = failure.error.info(),
                error = %failure.detail,
                client_addr = %client_addr,
                method = %request.method(),
                path = %request.uri().path(),
                user_agent = %user_agent,
                "JWT authentication failed"
            );

            state
                .errors
                .resolve(&failure.error)
                .cloned()
                .unwrap_or_else(ErrorResponse::authentication_failed)
                .into_response()
        }
    }
}

fn authenticate(tokens: &dyn TokenManager, headers: &HeaderMap) -> Result<AuthMember, AuthFailure> {
    let token = extract_token(headers)?;

    let claims = tokens.validate(token).map_err(|err| {
        let error = match err {
            TokenError::Expired => EXPIRED_TOKEN,
            TokenError::InvalidClaims => INVALID_CLAIMS,
            TokenError::Invalid | TokenError::Signing(_) => INVALID_TOKEN,
        };
        AuthFailure::new("validate_token", error, err.to_string())
    })?;

    if !claims.is_access() {
        return Err(AuthFailure::new(
            "check_claims",
            INVALID_TOKEN,
            "refresh token used as access token",
        ));
    }

    let member_id = claims.member_id().parse::<i64>().map_err(|_| {
        AuthFailure::new("check_claims", INVALID_CLAIMS, "subject is not a member id")
    })?;

    Ok(AuthMember {
        member_id,
        email: claims.email,
    })
}

fn extract_token(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Err(AuthFailure::new(
                "extract_token",
                MISSING_TOKEN,
                "authorization header is missing",
            ));
        }
    };

    let header = header.to_str().map_err(|_| {
        AuthFailure::new("extract_token", INVALID_TOKEN, "authorization header is not ASCII")
    })?;

    match header.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case(BEARER_SCHEME) && !token.trim().is_empty() =>
        {
            Ok(token.trim())
        }
        _ => Err(AuthFailure::new(
            "extract_token",
            INVALID_TOKEN,
            "authorization header is not a bearer token",
        )),
    }
}
