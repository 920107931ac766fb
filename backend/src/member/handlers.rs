//! Handler functions for member endpoints.

use crate::errors::ErrorResponse;
use crate::member::models::ProfileResponse;
use crate::member::service::MemberService;
use crate::state::AppState;
use crate::utils::context::RequestContext;
use axum::{extract::Extension, response::Json};

/// Return the authenticated member's profile
#[axum::debug_handler]
pub async fn get_profile(
    Extension(state): Extension<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Json<ProfileResponse>, ErrorResponse> {
    let member_id = match ctx.require_member() {
        Ok(member) => member.member_id,
        Err(error) => return Err(state.errors.respond(&ctx, &error)),
    };

    match MemberService::new(state.pool()).get_profile(&ctx, member_id).await {
        Ok(profile) => Ok(Json(profile)),
        Err(error) => Err(state.errors.respond(&ctx, &error)),
    }
}
