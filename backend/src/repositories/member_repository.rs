//! Database repository for member operations.
//!
//! Methods take a connection rather than the pool so services can run several
//! of them inside one transaction (`&mut *tx`).

use crate::database::models::{CreateMember, Member};
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqliteConnection;

const MEMBER_COLUMNS: &str = "id, email, name, phone_number, password_hash";

/// Repository for member database operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemberRepository;

impl MemberRepository {
    pub fn new() -> Self {
        Self
    }

    /// Checks whether a member with `email` exists (case-sensitive).
    pub async fn exists_by_email(&self, conn: &mut SqliteConnection, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE email = ?")
            .bind(email)
            .fetch_one(conn)
            .await
            .context("check member email")?;

        Ok(count > 0)
    }

    /// Creates a new member and returns the stored row.
    ///
    /// A duplicate email surfaces as a unique-constraint error in the chain;
    /// see [`is_unique_violation`].
    pub async fn create(&self, conn: &mut SqliteConnection, member: CreateMember) -> Result<Member> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO members (email, name, phone_number, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {}",
            MEMBER_COLUMNS
        );

        let member = sqlx::query_as::<_, Member>(&query)
            .bind(member.email)
            .bind(member.name)
            .bind(member.phone_number)
            .bind(member.password_hash)
            .bind(now)
            .bind(now)
            .fetch_one(conn)
            .await
            .context("insert member")?;

        Ok(member)
    }

    pub async fn find_by_email(
        &self,
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<Member>> {
        let query = format!("SELECT {} FROM members WHERE email = ?", MEMBER_COLUMNS);

        let member = sqlx::query_as::<_, Member>(&query)
            .bind(email)
            .fetch_optional(conn)
            .await
            .context("find member by email")?;

        Ok(member)
    }

    pub async fn find_by_id(&self, conn: &mut SqliteConnection, id: i64) -> Result<Option<Member>> {
        let query = format!("SELECT {} FROM members WHERE id = ?", MEMBER_COLUMNS);

        let member = sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
            .context("find member by id")?;

        Ok(member)
    }
}

/// True when `err` was caused by a unique-constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<sqlx::Error>())
        .filter_map(|db_err| db_err.as_database_error())
        .any(|db_err| db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;

    fn new_member(email: &str) -> CreateMember {
        CreateMember {
            email: email.to_string(),
            name: "Grace".to_string(),
            phone_number: "010-1234-5678".to_string(),
            password_hash: "$2b$04$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = MemberRepository::new();

        let created = repo.create(&mut conn, new_member("a@b.co")).await.unwrap();
        assert!(created.id > 0);

        let by_email = repo.find_by_email(&mut conn, "a@b.co").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.phone_number, "010-1234-5678");

        let by_id = repo.find_by_id(&mut conn, created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.co");

        assert!(repo.exists_by_email(&mut conn, "a@b.co").await.unwrap());
        assert!(!repo.exists_by_email(&mut conn, "A@b.co").await.unwrap());

        let stamped: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM members WHERE created_at IS NOT NULL AND updated_at = created_at",
        )
        .fetch_one(&mut *conn)
        .await
        .unwrap();
        assert_eq!(stamped, 1);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = MemberRepository::new();

        assert!(repo.find_by_id(&mut conn, 999).await.unwrap().is_none());
        assert!(repo.find_by_email(&mut conn, "x@y.co").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let repo = MemberRepository::new();

        repo.create(&mut conn, new_member("a@b.co")).await.unwrap();
        let err = repo.create(&mut conn, new_member("a@b.co")).await.unwrap_err();

        assert!(is_unique_violation(&err));
        assert!(!is_unique_violation(&anyhow::anyhow!("disk full")));
    }
}
