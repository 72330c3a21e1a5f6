use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

use crate::models::{like_set::LikeSet, user::UserSummary};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub user: Thing,
    pub text: String,
    pub likes: LikeSet,
    pub replies: Vec<Reply>,
    pub created_at: Datetime,
}

/// Embedded reply. Replies are one level deep: they carry no replies of their own.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Reply {
    pub id: String,
    pub user: Thing,
    pub text: String,
    pub likes: LikeSet,
    pub timestamp: Datetime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CommentWithAuthor {
    pub id: Thing,
    pub user: UserSummary,
    pub text: String,
    pub likes: LikeSet,
    pub replies: Vec<Reply>,
    pub created_at: Datetime,
}

#[derive(Debug, Serialize, Clone)]
pub struct CommentLikeResponse {
    pub message: String,
    pub comment: CommentWithAuthor,
}
