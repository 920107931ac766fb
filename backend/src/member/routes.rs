//! Defines the HTTP routes for member resources.
//!
//! Every route here requires a bearer access token.

use crate::auth::middleware::jwt_auth;
use crate::member::handlers::*;
use axum::{Router, middleware, routing::get};

pub fn member_router() -> Router {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/me", get(get_profile))
        .route_layer(middleware::from_fn(jwt_auth))
}
