use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

use crate::{error::Error, models::post::PostWithSong};

pub const DEFAULT_PROFILE_PICTURE: &str = "default-profile.png";

#[derive(strum_macros::Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Privacy {
    #[default]
    Private,
    Public,
}

impl Privacy {
    pub fn toggled(self) -> Self {
        match self {
            Self::Private => Self::Public,
            Self::Public => Self::Private,
        }
    }
}

impl std::str::FromStr for Privacy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Public" => Ok(Self::Public),
            "Private" => Ok(Self::Private),
            other => Err(Error::InvalidInput {
                reason: format!("Unknown privacy '{other}'"),
            }),
        }
    }
}

/// Full user document, password hash included. Never returned to clients.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub picture_path: String,
    pub followers: Vec<Thing>,
    pub following: Vec<Thing>,
    pub playlists: Vec<Thing>,
    pub songs: Vec<Thing>,
    pub posts: Vec<Thing>,
    pub liked_songs: Thing,
    pub privacy: Privacy,
    pub created_at: Datetime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    pub id: Thing,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    // no password
    pub picture_path: String,
    pub followers: Vec<Thing>,
    pub following: Vec<Thing>,
    pub playlists: Vec<Thing>,
    pub songs: Vec<Thing>,
    pub posts: Vec<Thing>,
    pub liked_songs: Thing,
    pub privacy: Privacy,
    pub created_at: Datetime,
}

/// Partial projection used for comment and reply authors.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserSummary {
    pub id: Thing,
    pub username: String,
    pub picture_path: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FollowSummary {
    pub id: Thing,
    pub username: String,
    pub picture_path: String,
    pub followers: Vec<Thing>,
    pub following: Vec<Thing>,
    pub playlists: Vec<Thing>,
}

#[derive(Debug, Serialize, Clone)]
pub struct UserPage {
    pub user: UserProfile,
    pub posts: Vec<PostWithSong>,
}

#[derive(Debug, Default, Clone)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub privacy: Option<Privacy>,
    pub picture_path: Option<String>,
}
