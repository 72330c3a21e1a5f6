use serde::{Deserialize, Serialize};

use crate::models::{playlist::Playlist, song::SongWithOwner, user::UserProfile};

pub const MAX_RECENT_SEARCHES: usize = 6;

#[derive(strum_macros::Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFilter {
    #[default]
    All,
    Songs,
    Playlists,
    Artists,
    Profiles,
}

impl SearchFilter {
    pub fn includes(self, category: SearchFilter) -> bool {
        self == SearchFilter::All || self == category
    }

    /// Per-category result cap: a category shown alone gets the wider cap.
    pub fn limit_for(self, category: SearchFilter) -> u32 {
        let selected = self == category;
        match category {
            SearchFilter::Songs if selected => 8,
            SearchFilter::Songs => 4,
            _ if selected => 16,
            _ => 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub filter: Option<SearchFilter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub songs: Vec<SongWithOwner>,
    pub playlists: Vec<Playlist>,
    pub artists: Vec<UserProfile>,
    pub profiles: Vec<UserProfile>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchItemType {
    Song,
    Playlist,
    Profile,
}

/// One entry of a user's recent-search list.
///
/// Identity is the `(id, type)` pair; everything else is display data the
/// client chose to keep with the entry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecentSearchItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SearchItemType,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl RecentSearchItem {
    pub fn same_target(&self, other: &RecentSearchItem) -> bool {
        self.id == other.id && self.kind == other.kind
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppendRecentSearchRequest {
    pub user_id: Option<String>,
    pub new_search_item: RecentSearchItem,
}

#[derive(Debug, Serialize, Clone)]
pub struct RecentSearchesResponse {
    pub recent_searches: Vec<RecentSearchItem>,
}
