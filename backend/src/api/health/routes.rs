//! Defines the HTTP route for the health check.

use super::handlers::health;
use axum::{Router, routing::get};

pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}
