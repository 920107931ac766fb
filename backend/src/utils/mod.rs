//! Collection of general utility functions and common traits.
//!
//! Token handling, password hashing, log masking, request context and
//! logging setup live here; none of them depend on a specific domain module.

pub mod context;
pub mod jwt;
pub mod logging;
pub mod mask;
pub mod password;
