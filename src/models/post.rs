use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

use crate::models::{
    comment::CommentWithAuthor,
    like_set::LikeSet,
    song::Song,
    user::UserProfile,
};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Post {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub user: Thing,
    pub song: Thing,
    pub caption: Option<String>,
    pub likes: LikeSet,
    /// Users whose song like was added by liking this post, and is taken
    /// back when they unlike it.
    #[serde(default)]
    pub song_likes_granted: LikeSet,
    pub comments: Vec<Thing>,
    pub created_at: Datetime,
}

/// Post expanded for feeds: song, owner and comments (with their authors).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PostWithRelations {
    pub id: Thing,
    pub user: UserProfile,
    pub song: Song,
    pub caption: Option<String>,
    pub likes: LikeSet,
    pub comments: Vec<CommentWithAuthor>,
    pub created_at: Datetime,
}

/// Post with only its song expanded, used on profile pages.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PostWithSong {
    pub id: Thing,
    pub user: Thing,
    pub song: Song,
    pub caption: Option<String>,
    pub likes: LikeSet,
    pub comments: Vec<Thing>,
    pub created_at: Datetime,
}

#[derive(Debug, Clone)]
pub struct CreatePostRequest {
    pub title: String,
    pub caption: Option<String>,
    pub audio: crate::services::media_service::UploadedFile,
    pub picture: crate::services::media_service::UploadedFile,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CommentPayload {
    pub text: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct PostLikeResponse {
    pub liked: bool,
    pub post: PostWithRelations,
}
