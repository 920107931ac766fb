//! Authentication module for member signup, login and access control.
//!
//! This module provides the public interface for authentication: the signup
//! and login endpoints, the service behind them, and the bearer-token
//! middleware that guards member routes.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
