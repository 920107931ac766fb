//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. API-facing views live next to their handlers.

use sqlx::FromRow;

/// A row of the `members` table. The audit timestamps are written on insert
/// but never read back.
#[derive(Debug, Clone, FromRow)]
pub struct Member {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub password_hash: String,
}

/// Values needed to insert a member; the id is assigned by storage.
#[derive(Debug, Clone)]
pub struct CreateMember {
    pub email: String,
    pub name: String,
    pub phone_number: String,
    pub password_hash: String,
}
