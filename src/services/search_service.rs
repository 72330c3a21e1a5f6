use serde::de::DeserializeOwned;
use surrealdb::{engine::any::Any, Surreal};

use crate::{
    error::{Error, Result},
    models::{
        search::{SearchFilter, SearchResult},
        user::Privacy,
    },
};

const MAX_QUERY_LEN: usize = 50;

const SONGS_SQL: &str = r#"
    SELECT id, title, artist, file_path, picture_path, duration, likes, created_at,
        (SELECT id, username, picture_path FROM ONLY $parent.user) AS user
    FROM song
    WHERE string::lowercase(title) CONTAINS $text AND user.privacy = $public
    LIMIT $limit
"#;

const PLAYLISTS_SQL: &str = r#"
    SELECT * FROM playlist
    WHERE string::lowercase(name) CONTAINS $text AND privacy = $public
    LIMIT $limit
"#;

const ARTISTS_SQL: &str = r#"
    SELECT * OMIT password FROM user
    WHERE string::lowercase(username) CONTAINS $text AND array::len(songs) > 0
    LIMIT $limit
"#;

const PROFILES_SQL: &str = r#"
    SELECT * OMIT password FROM user
    WHERE string::lowercase(username) CONTAINS $text
    LIMIT $limit
"#;

pub struct SearchService;

impl SearchService {
    async fn category<T: DeserializeOwned>(
        db: &Surreal<Any>,
        sql: &str,
        text: &str,
        filter: SearchFilter,
        category: SearchFilter,
    ) -> Result<Vec<T>> {
        if !filter.includes(category) {
            return Ok(vec![]);
        }

        let rows: Vec<T> = db
            .query(sql)
            .bind(("text", text.to_string()))
            .bind(("public", Privacy::Public.to_string()))
            .bind(("limit", filter.limit_for(category)))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Case-insensitive substring search over song titles, playlist names
    /// and usernames. Selected categories are queried concurrently; any
    /// failure fails the whole search.
    pub async fn search(
        db: &Surreal<Any>,
        text: &str,
        filter: Option<SearchFilter>,
    ) -> Result<SearchResult> {
        let text = text.trim();
        if text.is_empty() || text.chars().count() > MAX_QUERY_LEN {
            return Err(Error::InvalidInput {
                reason: format!("Search text must be 1 to {MAX_QUERY_LEN} characters"),
            });
        }
        let text = text.to_lowercase();
        let filter = filter.unwrap_or_default();

        let (songs, playlists, artists, profiles) = futures::try_join!(
            Self::category(db, SONGS_SQL, &text, filter, SearchFilter::Songs),
            Self::category(db, PLAYLISTS_SQL, &text, filter, SearchFilter::Playlists),
            Self::category(db, ARTISTS_SQL, &text, filter, SearchFilter::Artists),
            Self::category(db, PROFILES_SQL, &text, filter, SearchFilter::Profiles),
        )?;

        tracing::debug!(
            "Search '{}' ({}): {} songs, {} playlists, {} artists, {} profiles",
            text,
            filter,
            songs.len(),
            playlists.len(),
            artists.len(),
            profiles.len()
        );

        Ok(SearchResult {
            songs,
            playlists,
            artists,
            profiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        helpers::thing_helpers::thing_id,
        services::playlist_service::PlaylistService,
        test_utils::{create_post, create_user, set_privacy, setup_db},
    };

    #[tokio::test]
    async fn test_private_owner_songs_are_hidden() {
        let db = setup_db().await;
        let public = create_user(&db, "loud").await;
        let private = create_user(&db, "quiet").await;
        set_privacy(&db, &public, Privacy::Public).await;
        create_post(&db, &public, "Midnight Drive").await;
        create_post(&db, &private, "Midnight Secret").await;

        let result = SearchService::search(&db, "MIDNIGHT", Some(SearchFilter::Songs))
            .await
            .unwrap();
        assert_eq!(result.songs.len(), 1);
        assert_eq!(result.songs[0].title, "Midnight Drive");
        assert_eq!(result.songs[0].user.username, "loud");
        assert!(result.profiles.is_empty());
    }

    #[tokio::test]
    async fn test_caps_per_filter() {
        let db = setup_db().await;
        let owner = create_user(&db, "owner").await;
        set_privacy(&db, &owner, Privacy::Public).await;
        for i in 0..10 {
            create_post(&db, &owner, &format!("beat {i}")).await;
        }

        let all = SearchService::search(&db, "beat", None).await.unwrap();
        assert_eq!(all.songs.len(), 4);

        let songs = SearchService::search(&db, "beat", Some(SearchFilter::Songs))
            .await
            .unwrap();
        assert_eq!(songs.songs.len(), 8);
    }

    #[tokio::test]
    async fn test_artists_and_profiles() {
        let db = setup_db().await;
        let maker = create_user(&db, "djmaker").await;
        create_user(&db, "djlistener").await;
        create_post(&db, &maker, "anything").await;

        let result = SearchService::search(&db, "dj", None).await.unwrap();
        assert_eq!(result.artists.len(), 1);
        assert_eq!(result.artists[0].username, "djmaker");
        assert_eq!(result.profiles.len(), 2);

        let only_profiles = SearchService::search(&db, "dj", Some(SearchFilter::Profiles))
            .await
            .unwrap();
        assert!(only_profiles.artists.is_empty());
        assert_eq!(only_profiles.profiles.len(), 2);
    }

    #[tokio::test]
    async fn test_only_public_playlists() {
        let db = setup_db().await;
        let alice = create_user(&db, "alice").await;
        let alice_id = thing_id(&alice);
        let hidden = PlaylistService::create_playlist(&db, &alice_id).await.unwrap();
        let shown = PlaylistService::create_playlist(&db, &alice_id).await.unwrap();
        PlaylistService::toggle_privacy(&db, &alice_id, &thing_id(shown.id.as_ref().unwrap()))
            .await
            .unwrap();

        let result = SearchService::search(&db, "my playlist", Some(SearchFilter::Playlists))
            .await
            .unwrap();
        assert_eq!(result.playlists.len(), 1);
        assert_eq!(result.playlists[0].id, shown.id);
        assert_ne!(result.playlists[0].id, hidden.id);
    }

    #[tokio::test]
    async fn test_text_validation() {
        let db = setup_db().await;
        let long = "x".repeat(51);
        for text in ["   ", long.as_str()] {
            let result = SearchService::search(&db, text, None).await;
            assert!(matches!(result, Err(Error::InvalidInput { .. })));
        }
    }
}
