use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

use crate::models::{
    song::Song,
    user::{Privacy, UserProfile},
};

pub const LIKED_SONGS_NAME: &str = "Liked Songs";
pub const DEFAULT_PLAYLIST_PICTURE: &str = "default-playlist.png";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Playlist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,

    pub name: String,
    pub songs: Vec<Thing>,
    pub privacy: Privacy,
    pub user: Thing,
    pub picture_path: String,
    pub description: String,

    // Timestamps
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaylistWithOwner {
    pub id: Thing,
    pub name: String,
    pub songs: Vec<Thing>,
    pub privacy: Privacy,
    pub user: UserProfile,
    pub picture_path: String,
    pub description: String,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaylistWithSongs {
    pub id: Thing,
    pub name: String,
    pub songs: Vec<Song>,
    pub privacy: Privacy,
    pub user: UserProfile,
    pub picture_path: String,
    pub description: String,
    pub created_at: Datetime,
    pub updated_at: Datetime,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaylistSongRequest {
    pub song_id: String,
}

/// Fields written by a playlist edit, merged in one `UPDATE`.
#[derive(Debug, Serialize, Clone)]
pub struct PlaylistChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_path: Option<String>,
    pub updated_at: Datetime,
}

#[derive(Debug, Default, Clone)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub picture_path: Option<String>,
}
