//! Defines the HTTP routes specifically for authentication.
//!
//! These routes are public; they are nested under `/api/v1/auth` by the main router.

use crate::auth::handlers::*;
use axum::{Router, routing::post};

pub fn auth_router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}
