//! Request-scoped context passed explicitly from middleware into services.

use std::sync::Arc;

use tracing::Span;

use crate::auth::errors::MISSING_TOKEN;
use crate::errors::{ServiceError, ServiceResult};

/// Identity attached by the authentication middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMember {
    pub member_id: i64,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Arc<str>,
    span: Span,
    member: Option<AuthMember>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<Arc<str>>, span: Span) -> Self {
        Self {
            request_id: request_id.into(),
            span,
            member: None,
        }
    }

    /// A context with no request span.
    #[cfg(test)]
    pub fn detached() -> Self {
        Self::new("detached", Span::none())
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn with_member(mut self, member: AuthMember) -> Self {
        self.member = Some(member);
        self
    }

    /// The authenticated member, or `MISSING_TOKEN` when the route was not authenticated.
    pub fn require_member(&self) -> ServiceResult<&AuthMember> {
        self.member
            .as_ref()
            .ok_or(ServiceError::Domain(MISSING_TOKEN))
    }
}
