use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

use crate::models::{like_set::LikeSet, user::UserSummary};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Song {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,

    pub title: String,
    // Snapshot of the uploader's username at upload time.
    pub artist: String,
    pub file_path: String,
    pub picture_path: String,
    // Seconds, read once from the uploaded audio.
    pub duration: f64,

    pub user: Thing,
    pub likes: LikeSet,
    pub created_at: Datetime,
}

/// Song joined with its owner, as returned by search.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SongWithOwner {
    pub id: Thing,
    pub title: String,
    pub artist: String,
    pub file_path: String,
    pub picture_path: String,
    pub duration: f64,
    pub likes: LikeSet,
    pub created_at: Datetime,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, Clone)]
pub struct SongLikeResponse {
    pub liked: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct SongOwnerResponse {
    pub user_id: Thing,
}
