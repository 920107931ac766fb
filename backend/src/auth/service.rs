//! Core business logic for the authentication system.

use crate::auth::errors::INCORRECT_EMAIL_PASSWORD;
use crate::auth::models::{LoginRequest, LoginResponse, SignupRequest};
use crate::database::models::CreateMember;
use crate::errors::{ServiceError, ServiceResult};
use crate::member::errors::MEMBER_ALREADY_EXISTS;
use crate::repositories::member_repository::{MemberRepository, is_unique_violation};
use crate::utils::context::RequestContext;
use crate::utils::jwt::TokenManager;
use crate::utils::mask::mask_email;
use crate::utils::password::PasswordHasher;
use anyhow::Context;
use sqlx::SqlitePool;

/// Authentication service for signup and login
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    tokens: &'a dyn TokenManager,
    hasher: &'a PasswordHasher,
    members: MemberRepository,
}

impl<'a> AuthService<'a> {
    pub fn new(
        pool: &'a SqlitePool,
        tokens: &'a dyn TokenManager,
        hasher: &'a PasswordHasher,
    ) -> Self {
        AuthService {
            pool,
            tokens,
            hasher,
            members: MemberRepository::new(),
        }
    }

    /// Register a new member.
    ///
    /// The existence check, hashing and insert share one transaction. It is
    /// opened with `BEGIN IMMEDIATE` so the write lock is held before the
    /// existence check: a concurrent signup for the same address waits, then
    /// sees the committed row. The unique index on `email` remains the backstop.
    pub async fn signup(&self, ctx: &RequestContext, request: SignupRequest) -> ServiceResult<()> {
        let masked = mask_email(&request.email);

        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .context("begin signup transaction")?;

        if self.members.exists_by_email(&mut *tx, &request.email).await? {
            tracing::warn!(parent: ctx.span(), email = %masked, "Signup rejected: email already registered");
            return Err(MEMBER_ALREADY_EXISTS.into());
        }

        let password_hash = self.hasher.hash_async(&request.password).await?;

        let created = self
            .members
            .create(
                &mut *tx,
                CreateMember {
                    email: request.email,
                    name: request.name,
                    phone_number: request.phone_number,
                    password_hash,
                },
            )
            .await;

        let member = match created {
            Ok(member) => member,
            Err(err) if is_unique_violation(&err) => {
                tracing::warn!(parent: ctx.span(), email = %masked, "Signup lost race on unique email");
                return Err(MEMBER_ALREADY_EXISTS.into());
            }
            Err(err) => return Err(err.into()),
        };

        tx.commit().await.context("commit signup transaction")?;

        tracing::info!(parent: ctx.span(), member_id = member.id, email = %masked, "Member signed up");
        Ok(())
    }

    /// Verify credentials and issue an access/refresh token pair.
    pub async fn login(
        &self,
        ctx: &RequestContext,
        request: LoginRequest,
    ) -> ServiceResult<LoginResponse> {
        let masked = mask_email(&request.email);

        let mut conn = self.pool.acquire().await.context("acquire connection")?;
        let member = self.members.find_by_email(&mut conn, &request.email).await?;
        drop(conn);

        let verified = self
            .hasher
            .verify_async(
                &request.password,
                member.as_ref().map(|member| member.password_hash.as_str()),
            )
            .await?;

        let member = match member {
            Some(member) if verified => member,
            Some(member) => {
                tracing::warn!(parent: ctx.span(), member_id = member.id, email = %masked, "Login failed: wrong password");
                return Err(INCORRECT_EMAIL_PASSWORD.into());
            }
            None => {
                tracing::warn!(parent: ctx.span(), email = %masked, "Login failed: unknown email");
                return Err(INCORRECT_EMAIL_PASSWORD.into());
            }
        };

        let member_id = member.id.to_string();
        let access_token = self
            .tokens
            .issue_access_token(&member_id, &member.email)
            .map_err(ServiceError::TokenIssuance)?;
        let refresh_token = self
            .tokens
            .issue_refresh_token(&member_id, &member.email)
            .map_err(ServiceError::TokenIssuance)?;

        tracing::info!(parent: ctx.span(), member_id = member.id, email = %masked, "Member logged in");

        Ok(LoginResponse {
            access_token,
            refresh_token,
        })
    }
}
