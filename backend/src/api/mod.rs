//! Central module for organizing the application's HTTP surface.
//!
//! Assembles the domain routers under `/api/v1`, the health endpoint, and the
//! middleware stack shared by every route.

pub mod common;
pub mod health;
pub mod middleware;

use axum::{Extension, Router, middleware as axum_middleware};
use tower_http::catch_panic::CatchPanicLayer;

use crate::auth::routes::auth_router;
use crate::errors::ErrorRegistry;
use crate::member::routes::member_router;
use crate::state::AppState;

/// Registers every domain error response. Called once at startup.
pub fn build_error_registry() -> ErrorRegistry {
    let mut registry = ErrorRegistry::new();
    crate::auth::errors::register(&mut registry);
    crate::member::errors::register(&mut registry);
    registry
}

/// Builds the application router.
///
/// Layers run outermost first: panic recovery, shared state, request context,
/// CORS, then the request deadline.
pub fn router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();
    let cors = middleware::cors_layer(&state.config);

    Router::new()
        .nest("/api/v1/auth", auth_router())
        .nest("/api/v1/members", member_router())
        .merge(health::routes::health_router())
        .layer(axum_middleware::from_fn_with_state(
            timeout,
            middleware::request_timeout,
        ))
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::request_context))
        .layer(Extension(state))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::errors::{INCORRECT_EMAIL_PASSWORD, MISSING_TOKEN};
    use crate::errors::ErrorResponse;
    use crate::member::errors::{MEMBER_ALREADY_EXISTS, MEMBER_NOT_FOUND};
    use crate::test_support::{MockTokenManager, test_state, test_state_with_tokens};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SIGNUP_BODY: &str =
        r#"{"name":"A","email":"a@x.com","phoneNumber":"010-1234-5678","password":"password1"}"#;

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_registry_contains_all_domain_errors() {
        let registry = build_error_registry();
        assert_eq!(registry.len(), 7);

        let missing = registry.resolve(&MISSING_TOKEN).unwrap();
        assert_eq!((missing.status, missing.code.as_str()), (401, "AUTH-000"));

        let incorrect = registry.resolve(&INCORRECT_EMAIL_PASSWORD).unwrap();
        assert_eq!((incorrect.status, incorrect.code.as_str()), (400, "AUTH-003"));

        let not_found = registry.resolve(&MEMBER_NOT_FOUND).unwrap();
        assert_eq!((not_found.status, not_found.code.as_str()), (404, "MEMBER-001"));

        let exists = registry.resolve(&MEMBER_ALREADY_EXISTS).unwrap();
        assert_eq!((exists.status, exists.code.as_str()), (409, "MEMBER-002"));
    }

    #[tokio::test]
    async fn test_signup_login_profile_scenario() {
        let app = router(test_state().await);

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/auth/signup", SIGNUP_BODY))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(body_bytes(response).await.is_empty());

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/login",
                r#"{"email":"a@x.com","password":"password1"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let tokens = body_json(response).await;
        let access_token = tokens["accessToken"].as_str().unwrap().to_string();
        assert!(!access_token.is_empty());
        assert!(!tokens["refreshToken"].as_str().unwrap().is_empty());

        let response = app
            .clone()
            .oneshot(get_with_token("/api/v1/members/profile", Some(&access_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let profile = body_json(response).await;
        assert_eq!(profile["name"], "A");
        assert_eq!(profile["email"], "a@x.com");
        assert_eq!(profile["phoneNumber"], "010-1234-5678");
        assert!(profile["id"].is_i64());
        assert!(profile.get("password").is_none());
        assert!(profile.get("passwordHash").is_none());
        assert!(profile.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let app = router(test_state().await);

        let first = app
            .clone()
            .oneshot(post_json("/api/v1/auth/signup", SIGNUP_BODY))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .clone()
            .oneshot(post_json("/api/v1/auth/signup", SIGNUP_BODY))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(second).await["code"], "MEMBER-002");
    }

    #[tokio::test]
    async fn test_login_failures_have_identical_bodies() {
        let app = router(test_state().await);
        app.clone()
            .oneshot(post_json("/api/v1/auth/signup", SIGNUP_BODY))
            .await
            .unwrap();

        let wrong_password = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/login",
                r#"{"email":"a@x.com","password":"password2"}"#,
            ))
            .await
            .unwrap();
        let unknown_email = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/login",
                r#"{"email":"b@x.com","password":"password1"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
        assert_eq!(unknown_email.status(), StatusCode::BAD_REQUEST);

        let wrong_password = body_bytes(wrong_password).await;
        assert_eq!(wrong_password, body_bytes(unknown_email).await);

        let envelope: ErrorResponse = serde_json::from_slice(&wrong_password).unwrap();
        assert_eq!(envelope.code, "AUTH-003");
    }

    #[tokio::test]
    async fn test_validation_and_format_errors() {
        let app = router(test_state().await);

        let invalid_phone = app
            .clone()
            .oneshot(post_json(
                "/api/v1/auth/signup",
                r#"{"name":"A","email":"a@x.com","phoneNumber":"123","password":"password1"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(invalid_phone.status(), StatusCode::BAD_REQUEST);
        let envelope = body_json(invalid_phone).await;
        assert_eq!(envelope["code"], "ERROR-001");
        assert_eq!(envelope["status"], 400);

        let missing_fields = app
            .clone()
            .oneshot(post_json("/api/v1/auth/login", "{}"))
            .await
            .unwrap();
        assert_eq!(missing_fields.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(missing_fields).await["code"], "ERROR-001");

        let malformed = app
            .clone()
            .oneshot(post_json("/api/v1/auth/login", "{\"email\":"))
            .await
            .unwrap();
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(malformed).await["code"], "ERROR-002");
    }

    #[tokio::test]
    async fn test_profile_requires_access_token() {
        let state = test_state().await;
        let refresh_token = state.tokens.issue_refresh_token("1", "a@x.com").unwrap();
        let app = router(state);

        let missing = app
            .clone()
            .oneshot(get_with_token("/api/v1/members/profile", None))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(missing).await,
            json!({"status": 401, "code": "AUTH-000", "message": "Please log in."})
        );

        let refresh = app
            .clone()
            .oneshot(get_with_token("/api/v1/members/profile", Some(&refresh_token)))
            .await
            .unwrap();
        assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(refresh).await["code"], "AUTH-000");
    }

    #[tokio::test]
    async fn test_profile_for_deleted_member_is_not_found() {
        let state = test_state().await;
        let access_token = state.tokens.issue_access_token("999", "ghost@x.com").unwrap();
        let app = router(state);

        let response = app
            .oneshot(get_with_token("/api/v1/members/me", Some(&access_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "MEMBER-001");
    }

    #[tokio::test]
    async fn test_token_issuance_failure_is_internal_error() {
        let app = router(test_state_with_tokens(Arc::new(MockTokenManager::failing())).await);
        app.clone()
            .oneshot(post_json("/api/v1/auth/signup", SIGNUP_BODY))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/api/v1/auth/login",
                r#"{"email":"a@x.com","password":"password1"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let envelope: ErrorResponse =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(envelope, ErrorResponse::internal());
    }

    #[tokio::test]
    async fn test_health_and_request_id() {
        let app = router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "health-check-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "health-check-1");
        assert_eq!(body_json(response).await["status"], "healthy");
    }
}
