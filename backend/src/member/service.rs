//! Member profile retrieval.

use anyhow::Context;
use sqlx::SqlitePool;

use crate::errors::ServiceResult;
use crate::member::errors::MEMBER_NOT_FOUND;
use crate::member::models::ProfileResponse;
use crate::repositories::member_repository::MemberRepository;
use crate::utils::context::RequestContext;

pub struct MemberService<'a> {
    pool: &'a SqlitePool,
    members: MemberRepository,
}

impl<'a> MemberService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        MemberService {
            pool,
            members: MemberRepository::new(),
        }
    }

    /// Loads the profile of `member_id`.
    pub async fn get_profile(
        &self,
        ctx: &RequestContext,
        member_id: i64,
    ) -> ServiceResult<ProfileResponse> {
        let mut tx = self.pool.begin().await.context("begin profile transaction")?;

        let member = self.members.find_by_id(&mut *tx, member_id).await?;

        tx.commit().await.context("commit profile transaction")?;

        match member {
            Some(member) => Ok(member.into()),
            None => {
                tracing::warn!(parent: ctx.span(), member_id, "Profile requested for missing member");
                Err(MEMBER_NOT_FOUND.into())
            }
        }
    }
}
