use chrono::Utc;
use surrealdb::{engine::any::Any, Surreal};

use crate::{
    error::{Error, Result},
    helpers::{
        playlist_helpers::{get_owned_playlist, get_playlist},
        song_helpers::song_exists,
        thing_helpers::{
            create_playlist_thing, create_song_thing, create_user_thing, new_thing, parse_id_part,
            thing_id,
        },
        user_helpers::{ensure_owner, get_user_record},
    },
    models::{
        playlist::{
            Playlist, PlaylistChanges, PlaylistWithOwner, PlaylistWithSongs, UpdatePlaylistRequest,
            DEFAULT_PLAYLIST_PICTURE,
        },
        user::Privacy,
    },
    services::media_service::MediaStorage,
};

const PLAYLIST_FIELDS: &str =
    "id, name, privacy, picture_path, description, created_at, updated_at";

pub struct PlaylistService;

impl PlaylistService {
    /// Fails when `playlist` is the owner's Liked Songs playlist, which only
    /// changes through likes.
    async fn ensure_not_liked_songs(db: &Surreal<Any>, playlist: &Playlist) -> Result<()> {
        let owner = get_user_record(db, &thing_id(&playlist.user)).await?;
        if playlist.id.as_ref() == Some(&owner.liked_songs) {
            return Err(Error::Forbidden {
                reason: "The Liked Songs playlist is managed through likes".to_string(),
            });
        }
        Ok(())
    }

    /// Creates an empty, private `My Playlist #N`, N being the user's
    /// playlist count plus one.
    pub async fn create_playlist(db: &Surreal<Any>, user_id: &str) -> Result<Playlist> {
        let user = get_user_record(db, user_id).await?;
        let playlist_thing = new_thing("playlist");
        let now = Utc::now();

        let playlist = Playlist {
            id: None,
            name: format!("My Playlist #{}", user.playlists.len() + 1),
            songs: vec![],
            privacy: Privacy::Private,
            user: create_user_thing(user_id),
            picture_path: DEFAULT_PLAYLIST_PICTURE.to_string(),
            description: String::new(),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let sql = r#"
            BEGIN TRANSACTION;
            CREATE $playlist CONTENT $content;
            UPDATE $user SET playlists += $playlist;
            COMMIT TRANSACTION;
        "#;

        db.query(sql)
            .bind(("playlist", playlist_thing.clone()))
            .bind(("content", playlist))
            .bind(("user", create_user_thing(user_id)))
            .await?
            .check()?;

        get_playlist(db, &thing_id(&playlist_thing)).await
    }

    pub async fn get_user_playlists(
        db: &Surreal<Any>,
        user_id: &str,
    ) -> Result<Vec<PlaylistWithOwner>> {
        let sql = format!(
            r#"
            SELECT {PLAYLIST_FIELDS}, songs,
                (SELECT * OMIT password FROM ONLY $parent.user) AS user
            FROM playlist WHERE user = $user ORDER BY created_at ASC
            "#
        );
        let playlists: Vec<PlaylistWithOwner> = db
            .query(sql)
            .bind(("user", create_user_thing(user_id)))
            .await?
            .take(0)?;
        Ok(playlists)
    }

    /// Playlist with its songs and owner, no visibility check.
    pub(crate) async fn get_playlist_with_songs(
        db: &Surreal<Any>,
        playlist_id: &str,
    ) -> Result<PlaylistWithSongs> {
        let sql = format!(
            r#"
            SELECT {PLAYLIST_FIELDS},
                (SELECT * FROM $parent.songs) AS songs,
                (SELECT * OMIT password FROM ONLY $parent.user) AS user
            FROM $playlist
            "#
        );
        let playlist: Option<PlaylistWithSongs> = db
            .query(sql)
            .bind(("playlist", create_playlist_thing(playlist_id)))
            .await?
            .take(0)?;

        playlist.ok_or_else(|| Error::PlaylistNotFound {
            id: parse_id_part(playlist_id).to_string(),
        })
    }

    /// Private playlists are only visible to their owner.
    pub async fn get_playlist(
        db: &Surreal<Any>,
        viewer_id: &str,
        playlist_id: &str,
    ) -> Result<PlaylistWithSongs> {
        let playlist = get_playlist(db, playlist_id).await?;
        if playlist.privacy == Privacy::Private {
            ensure_owner(&playlist.user, viewer_id, "playlist")?;
        }
        Self::get_playlist_with_songs(db, playlist_id).await
    }

    /// Appends a song. The membership check and the append are one guarded
    /// statement: when it updates nothing the song was already there.
    pub async fn add_song(
        db: &Surreal<Any>,
        user_id: &str,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<Playlist> {
        let playlist = get_owned_playlist(db, playlist_id, user_id).await?;
        Self::ensure_not_liked_songs(db, &playlist).await?;

        if !song_exists(db, song_id).await? {
            return Err(Error::SongNotFound {
                id: parse_id_part(song_id).to_string(),
            });
        }

        let updated: Vec<Playlist> = db
            .query(
                "UPDATE $playlist SET songs += $song, updated_at = time::now() \
                 WHERE songs CONTAINSNOT $song RETURN AFTER",
            )
            .bind(("playlist", create_playlist_thing(playlist_id)))
            .bind(("song", create_song_thing(song_id)))
            .await?
            .take(0)?;

        updated
            .into_iter()
            .next()
            .ok_or_else(|| Error::SongAlreadyInPlaylist {
                song_id: parse_id_part(song_id).to_string(),
                playlist_id: parse_id_part(playlist_id).to_string(),
            })
    }

    pub async fn remove_song(
        db: &Surreal<Any>,
        user_id: &str,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<Playlist> {
        let playlist = get_owned_playlist(db, playlist_id, user_id).await?;
        Self::ensure_not_liked_songs(db, &playlist).await?;

        let updated: Vec<Playlist> = db
            .query(
                "UPDATE $playlist SET songs = array::complement(songs, [$song]), \
                 updated_at = time::now() WHERE songs CONTAINS $song RETURN AFTER",
            )
            .bind(("playlist", create_playlist_thing(playlist_id)))
            .bind(("song", create_song_thing(song_id)))
            .await?
            .take(0)?;

        updated.into_iter().next().ok_or_else(|| Error::SongNotFound {
            id: parse_id_part(song_id).to_string(),
        })
    }

    pub async fn update_playlist(
        db: &Surreal<Any>,
        media: &MediaStorage,
        user_id: &str,
        playlist_id: &str,
        request: UpdatePlaylistRequest,
    ) -> Result<Playlist> {
        let playlist = get_owned_playlist(db, playlist_id, user_id).await?;

        let name = match request.name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() || name.chars().count() > 100 {
                    return Err(Error::InvalidInput {
                        reason: "Playlist name must be 1 to 100 characters".to_string(),
                    });
                }
                Some(name)
            }
            None => None,
        };
        let description = request.description.map(|d| d.trim().to_string());
        let new_picture = request.picture_path.is_some();

        if name.is_none() && description.is_none() && !new_picture {
            return Ok(playlist);
        }

        let changes = PlaylistChanges {
            name,
            description,
            picture_path: request.picture_path,
            updated_at: Utc::now().into(),
        };

        let updated: Option<Playlist> = db
            .query("UPDATE $playlist MERGE $changes RETURN AFTER")
            .bind(("playlist", create_playlist_thing(playlist_id)))
            .bind(("changes", changes))
            .await?
            .take(0)?;

        if new_picture {
            media.remove_url(&playlist.picture_path).await;
        }

        updated.ok_or_else(|| Error::PlaylistNotFound {
            id: parse_id_part(playlist_id).to_string(),
        })
    }

    pub async fn toggle_privacy(
        db: &Surreal<Any>,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<Playlist> {
        get_owned_playlist(db, playlist_id, user_id).await?;

        let updated: Option<Playlist> = db
            .query(
                r#"UPDATE $playlist SET
                    privacy = IF privacy = "Public" THEN "Private" ELSE "Public" END,
                    updated_at = time::now()
                RETURN AFTER"#,
            )
            .bind(("playlist", create_playlist_thing(playlist_id)))
            .await?
            .take(0)?;

        updated.ok_or_else(|| Error::PlaylistNotFound {
            id: parse_id_part(playlist_id).to_string(),
        })
    }

    pub async fn delete_playlist(
        db: &Surreal<Any>,
        media: &MediaStorage,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<()> {
        let playlist = get_owned_playlist(db, playlist_id, user_id).await?;
        Self::ensure_not_liked_songs(db, &playlist).await?;

        let sql = r#"
            BEGIN TRANSACTION;
            UPDATE $user SET playlists = array::complement(playlists, [$playlist]);
            DELETE $playlist;
            COMMIT TRANSACTION;
        "#;

        db.query(sql)
            .bind(("user", playlist.user))
            .bind(("playlist", create_playlist_thing(playlist_id)))
            .await?
            .check()?;

        media.remove_url(&playlist.picture_path).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_post, create_user, post_song, setup_db, test_media};
    use surrealdb::sql::Thing;

    async fn fixture(db: &Surreal<Any>) -> (Thing, Thing, Thing) {
        let alice = create_user(db, "alice").await;
        let bob = create_user(db, "bob").await;
        let song = post_song(db, &create_post(db, &alice, "tune").await).await;
        (alice, bob, song)
    }

    #[tokio::test]
    async fn test_create_names_by_count() {
        let db = setup_db().await;
        let (alice, _, _) = fixture(&db).await;
        let alice_id = thing_id(&alice);

        // Liked Songs already counts as the first playlist.
        let first = PlaylistService::create_playlist(&db, &alice_id).await.unwrap();
        assert_eq!(first.name, "My Playlist #2");
        let second = PlaylistService::create_playlist(&db, &alice_id).await.unwrap();
        assert_eq!(second.name, "My Playlist #3");

        let all = PlaylistService::get_user_playlists(&db, &alice_id).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|p| p.user.id == alice));
        assert_eq!(get_user_record(&db, &alice_id).await.unwrap().playlists.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_add_is_conflict() {
        let db = setup_db().await;
        let (alice, _, song) = fixture(&db).await;
        let alice_id = thing_id(&alice);
        let playlist = PlaylistService::create_playlist(&db, &alice_id).await.unwrap();
        let playlist_id = thing_id(playlist.id.as_ref().unwrap());

        let updated = PlaylistService::add_song(&db, &alice_id, &playlist_id, &thing_id(&song))
            .await
            .unwrap();
        assert_eq!(updated.songs, vec![song.clone()]);

        let again = PlaylistService::add_song(&db, &alice_id, &playlist_id, &thing_id(&song)).await;
        assert!(matches!(again, Err(Error::SongAlreadyInPlaylist { .. })));

        let stored = get_playlist(&db, &playlist_id).await.unwrap();
        assert_eq!(stored.songs.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_store_song_once() {
        let db = setup_db().await;
        let (alice, _, song) = fixture(&db).await;
        let alice_id = thing_id(&alice);
        let playlist = PlaylistService::create_playlist(&db, &alice_id).await.unwrap();
        let playlist_id = thing_id(playlist.id.as_ref().unwrap());
        let song_id = thing_id(&song);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = db.clone();
                let (alice_id, playlist_id, song_id) =
                    (alice_id.clone(), playlist_id.clone(), song_id.clone());
                tokio::spawn(async move {
                    PlaylistService::add_song(&db, &alice_id, &playlist_id, &song_id).await
                })
            })
            .collect();

        let mut added = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => added += 1,
                // A losing writer either sees the song or is rejected by the
                // storage engine's conflict check.
                Err(Error::SongAlreadyInPlaylist { .. } | Error::DbError(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(added, 1);

        let stored = get_playlist(&db, &playlist_id).await.unwrap();
        assert_eq!(stored.songs, vec![song]);
    }

    #[tokio::test]
    async fn test_add_and_remove_checks() {
        let db = setup_db().await;
        let (alice, bob, song) = fixture(&db).await;
        let alice_id = thing_id(&alice);
        let playlist = PlaylistService::create_playlist(&db, &alice_id).await.unwrap();
        let playlist_id = thing_id(playlist.id.as_ref().unwrap());

        let missing_song = PlaylistService::add_song(&db, &alice_id, &playlist_id, "nope").await;
        assert!(matches!(missing_song, Err(Error::SongNotFound { .. })));

        let missing_playlist = PlaylistService::add_song(&db, &alice_id, "nope", &thing_id(&song)).await;
        assert!(matches!(missing_playlist, Err(Error::PlaylistNotFound { .. })));

        let not_owner = PlaylistService::add_song(&db, &thing_id(&bob), &playlist_id, &thing_id(&song)).await;
        assert!(matches!(not_owner, Err(Error::Forbidden { .. })));

        let not_in = PlaylistService::remove_song(&db, &alice_id, &playlist_id, &thing_id(&song)).await;
        assert!(matches!(not_in, Err(Error::SongNotFound { .. })));

        PlaylistService::add_song(&db, &alice_id, &playlist_id, &thing_id(&song))
            .await
            .unwrap();
        let removed = PlaylistService::remove_song(&db, &alice_id, &playlist_id, &thing_id(&song))
            .await
            .unwrap();
        assert!(removed.songs.is_empty());
    }

    #[tokio::test]
    async fn test_liked_songs_is_protected() {
        let db = setup_db().await;
        let (media, _dir) = test_media().await;
        let (alice, _, song) = fixture(&db).await;
        let alice_id = thing_id(&alice);
        let liked = thing_id(&get_user_record(&db, &alice_id).await.unwrap().liked_songs);

        let delete = PlaylistService::delete_playlist(&db, &media, &alice_id, &liked).await;
        assert!(matches!(delete, Err(Error::Forbidden { .. })));

        let add = PlaylistService::add_song(&db, &alice_id, &liked, &thing_id(&song)).await;
        assert!(matches!(add, Err(Error::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_privacy_visibility_and_delete() {
        let db = setup_db().await;
        let (media, _dir) = test_media().await;
        let (alice, bob, _) = fixture(&db).await;
        let alice_id = thing_id(&alice);
        let playlist = PlaylistService::create_playlist(&db, &alice_id).await.unwrap();
        let playlist_id = thing_id(playlist.id.as_ref().unwrap());

        let hidden = PlaylistService::get_playlist(&db, &thing_id(&bob), &playlist_id).await;
        assert!(matches!(hidden, Err(Error::Forbidden { .. })));

        let toggled = PlaylistService::toggle_privacy(&db, &alice_id, &playlist_id)
            .await
            .unwrap();
        assert_eq!(toggled.privacy, Privacy::Public);

        let visible = PlaylistService::get_playlist(&db, &thing_id(&bob), &playlist_id)
            .await
            .unwrap();
        assert_eq!(visible.user.id, alice);

        PlaylistService::delete_playlist(&db, &media, &alice_id, &playlist_id)
            .await
            .unwrap();
        assert!(matches!(
            get_playlist(&db, &playlist_id).await,
            Err(Error::PlaylistNotFound { .. })
        ));
        assert_eq!(get_user_record(&db, &alice_id).await.unwrap().playlists.len(), 1);
    }

    #[tokio::test]
    async fn test_update_playlist() {
        let db = setup_db().await;
        let (media, _dir) = test_media().await;
        let (alice, bob, _) = fixture(&db).await;
        let alice_id = thing_id(&alice);
        let playlist = PlaylistService::create_playlist(&db, &alice_id).await.unwrap();
        let playlist_id = thing_id(playlist.id.as_ref().unwrap());

        let updated = PlaylistService::update_playlist(
            &db,
            &media,
            &alice_id,
            &playlist_id,
            UpdatePlaylistRequest {
                name: Some("Road trip".to_string()),
                description: Some(" summer ".to_string()),
                picture_path: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Road trip");
        assert_eq!(updated.description, "summer");
        assert_eq!(updated.privacy, playlist.privacy);
        assert_eq!(updated.created_at, playlist.created_at);
        assert!(updated.updated_at > playlist.updated_at);

        let forbidden = PlaylistService::update_playlist(
            &db,
            &media,
            &thing_id(&bob),
            &playlist_id,
            UpdatePlaylistRequest::default(),
        )
        .await;
        assert!(matches!(forbidden, Err(Error::Forbidden { .. })));
    }
}
