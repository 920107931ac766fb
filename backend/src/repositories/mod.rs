//! Data access layer.
//!
//! Repositories wrap SQL for one table each and return `anyhow::Result` with
//! operation context attached.

pub mod member_repository;
