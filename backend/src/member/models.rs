//! API views of member data.

use serde::{Deserialize, Serialize};

use crate::database::models::Member;

/// Profile returned to the authenticated member. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

impl From<Member> for ProfileResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            name: member.name,
            email: member.email,
            phone_number: member.phone_number,
        }
    }
}
