use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use crate::{
    error::{Error, Result},
    helpers::{
        like_helpers,
        song_helpers::get_song,
        thing_helpers::{create_song_thing, parse_id_part, thing_id},
        user_helpers::{ensure_owner, get_user_record},
    },
    models::{
        playlist::PlaylistWithSongs,
        song::{SongLikeResponse, SongOwnerResponse},
    },
    services::{media_service::MediaStorage, playlist_service::PlaylistService},
};

pub struct SongService;

impl SongService {
    /// Makes the user's Liked Songs playlist contain `song` exactly when
    /// `liked` is set. Idempotent.
    pub(crate) async fn align_liked_songs(
        db: &Surreal<Any>,
        song: Thing,
        user_id: &str,
        liked: bool,
    ) -> Result<()> {
        let user = get_user_record(db, user_id).await?;

        let sql = if liked {
            "UPDATE $playlist SET songs = array::union(songs, [$song]), updated_at = time::now();"
        } else {
            "UPDATE $playlist SET songs = array::complement(songs, [$song]), updated_at = time::now();"
        };

        db.query(sql)
            .bind(("playlist", user.liked_songs))
            .bind(("song", song))
            .await?
            .check()?;
        Ok(())
    }

    /// A liked post always has its song liked: dropping the song like drops
    /// the user's like on every post of that song.
    async fn release_post_likes(db: &Surreal<Any>, song: Thing, user_id: &str) -> Result<()> {
        let sql = r#"
            UPDATE post SET
                likes = array::complement(likes, [$user]),
                song_likes_granted = array::complement(song_likes_granted ?? [], [$user])
            WHERE song = $song AND likes CONTAINS $user;
        "#;

        db.query(sql)
            .bind(("song", song))
            .bind(("user", parse_id_part(user_id).to_string()))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn toggle_like(
        db: &Surreal<Any>,
        song_id: &str,
        user_id: &str,
    ) -> Result<SongLikeResponse> {
        let song = create_song_thing(song_id);
        let liked = like_helpers::toggle_like(db, song.clone(), user_id)
            .await?
            .ok_or_else(|| Error::SongNotFound {
                id: parse_id_part(song_id).to_string(),
            })?;

        Self::align_liked_songs(db, song.clone(), user_id, liked).await?;
        if !liked {
            Self::release_post_likes(db, song, user_id).await?;
        }

        let message = if liked {
            "Song added to Liked Songs"
        } else {
            "Song removed from Liked Songs"
        };
        Ok(SongLikeResponse {
            liked,
            message: message.to_string(),
        })
    }

    pub async fn get_liked_songs(db: &Surreal<Any>, user_id: &str) -> Result<PlaylistWithSongs> {
        let user = get_user_record(db, user_id).await?;
        PlaylistService::get_playlist_with_songs(db, &thing_id(&user.liked_songs)).await
    }

    pub async fn get_song_owner(db: &Surreal<Any>, song_id: &str) -> Result<SongOwnerResponse> {
        let song = get_song(db, song_id).await?;
        Ok(SongOwnerResponse { user_id: song.user })
    }

    /// Removes a song, every post built on it (with their comments) and every
    /// playlist reference, in one transaction.
    pub async fn delete_song(
        db: &Surreal<Any>,
        media: &MediaStorage,
        song_id: &str,
        user_id: &str,
    ) -> Result<()> {
        let song = get_song(db, song_id).await?;
        ensure_owner(&song.user, user_id, "song")?;

        let sql = r#"
            BEGIN TRANSACTION;
            LET $posts = (SELECT VALUE id FROM post WHERE song = $song);
            LET $comments = array::flatten((SELECT VALUE comments FROM post WHERE song = $song));
            DELETE comment WHERE id INSIDE $comments;
            UPDATE playlist SET songs = array::complement(songs, [$song]) WHERE songs CONTAINS $song;
            UPDATE $owner SET
                songs = array::complement(songs, [$song]),
                posts = array::complement(posts, $posts);
            DELETE post WHERE song = $song;
            DELETE $song;
            COMMIT TRANSACTION;
        "#;

        db.query(sql)
            .bind(("song", create_song_thing(song_id)))
            .bind(("owner", song.user))
            .await?
            .check()?;

        media.remove_url(&song.file_path).await;
        media.remove_url(&song.picture_path).await;

        tracing::info!("Deleted song {}", parse_id_part(song_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        helpers::{playlist_helpers::get_playlist, song_helpers::song_exists},
        models::post::Post,
        services::post_service::PostService,
        test_utils::{create_post, create_user, post_song, setup_db, test_media},
    };

    #[tokio::test]
    async fn test_song_like_round_trip_keeps_liked_songs_in_sync() {
        let db = setup_db().await;
        let alice = create_user(&db, "alice").await;
        let bob = create_user(&db, "bob").await;
        let song = post_song(&db, &create_post(&db, &alice, "tune").await).await;
        let song_id = thing_id(&song);
        let bob_id = thing_id(&bob);

        let response = SongService::toggle_like(&db, &song_id, &bob_id).await.unwrap();
        assert!(response.liked);
        assert!(get_song(&db, &song_id).await.unwrap().likes.contains(&bob_id));
        let liked = SongService::get_liked_songs(&db, &bob_id).await.unwrap();
        assert_eq!(liked.songs.len(), 1);
        assert_eq!(liked.songs[0].id.as_ref(), Some(&song));

        let response = SongService::toggle_like(&db, &song_id, &bob_id).await.unwrap();
        assert!(!response.liked);
        assert!(get_song(&db, &song_id).await.unwrap().likes.is_empty());
        assert!(SongService::get_liked_songs(&db, &bob_id)
            .await
            .unwrap()
            .songs
            .is_empty());
    }

    #[tokio::test]
    async fn test_song_unlike_drops_post_like() {
        let db = setup_db().await;
        let alice = create_user(&db, "alice").await;
        let bob = create_user(&db, "bob").await;
        let post = create_post(&db, &alice, "tune").await;
        let post_id = thing_id(&post);
        let song_id = thing_id(&post_song(&db, &post).await);
        let bob_id = thing_id(&bob);

        PostService::toggle_like(&db, &post_id, &bob_id).await.unwrap();
        let response = SongService::toggle_like(&db, &song_id, &bob_id).await.unwrap();
        assert!(!response.liked);

        let post = PostService::get_post_record(&db, &post_id).await.unwrap();
        assert!(post.likes.is_empty());
        assert!(post.song_likes_granted.is_empty());
        assert!(get_song(&db, &song_id).await.unwrap().likes.is_empty());

        // Liking the post again grants the song like afresh.
        PostService::toggle_like(&db, &post_id, &bob_id).await.unwrap();
        assert!(get_song(&db, &song_id).await.unwrap().likes.contains(&bob_id));
        assert_eq!(SongService::get_liked_songs(&db, &bob_id).await.unwrap().songs.len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_unknown_song() {
        let db = setup_db().await;
        let bob = create_user(&db, "bob").await;
        let result = SongService::toggle_like(&db, "nope", &thing_id(&bob)).await;
        assert!(matches!(result, Err(Error::SongNotFound { .. })));
    }

    #[tokio::test]
    async fn test_song_owner() {
        let db = setup_db().await;
        let alice = create_user(&db, "alice").await;
        let song = post_song(&db, &create_post(&db, &alice, "tune").await).await;

        let owner = SongService::get_song_owner(&db, &thing_id(&song)).await.unwrap();
        assert_eq!(owner.user_id, alice);
    }

    #[tokio::test]
    async fn test_delete_song_cascades() {
        let db = setup_db().await;
        let (media, _dir) = test_media().await;
        let alice = create_user(&db, "alice").await;
        let bob = create_user(&db, "bob").await;
        let post = create_post(&db, &alice, "tune").await;
        let song = post_song(&db, &post).await;
        let song_id = thing_id(&song);

        SongService::toggle_like(&db, &song_id, &thing_id(&bob)).await.unwrap();

        let forbidden = SongService::delete_song(&db, &media, &song_id, &thing_id(&bob)).await;
        assert!(matches!(forbidden, Err(Error::Forbidden { .. })));

        SongService::delete_song(&db, &media, &song_id, &thing_id(&alice))
            .await
            .unwrap();

        assert!(!song_exists(&db, &song_id).await.unwrap());
        let posts: Vec<Post> = db.select("post").await.unwrap();
        assert!(posts.is_empty());

        let owner = get_user_record(&db, &thing_id(&alice)).await.unwrap();
        assert!(owner.songs.is_empty() && owner.posts.is_empty());

        let liked = get_user_record(&db, &thing_id(&bob)).await.unwrap().liked_songs;
        assert!(get_playlist(&db, &thing_id(&liked)).await.unwrap().songs.is_empty());
    }
}
