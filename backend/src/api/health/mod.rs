//! Module for the service health endpoint.
//!
//! Reports whether the service and its database are reachable.

pub mod handlers;
pub mod routes;
