use surrealdb::{engine::any::Any, Surreal};

use crate::{
    error::{Error, Result},
    helpers::{
        thing_helpers::{create_playlist_thing, parse_id_part},
        user_helpers::ensure_owner,
    },
    models::playlist::Playlist,
};

pub async fn get_playlist(db: &Surreal<Any>, playlist_id: &str) -> Result<Playlist> {
    let playlist: Option<Playlist> = db
        .query("SELECT * FROM $playlist")
        .bind(("playlist", create_playlist_thing(playlist_id)))
        .await?
        .take(0)?;

    playlist.ok_or_else(|| Error::PlaylistNotFound {
        id: parse_id_part(playlist_id).to_string(),
    })
}

/// Loads a playlist and checks that `user_id` owns it.
pub async fn get_owned_playlist(
    db: &Surreal<Any>,
    playlist_id: &str,
    user_id: &str,
) -> Result<Playlist> {
    let playlist = get_playlist(db, playlist_id).await?;
    ensure_owner(&playlist.user, user_id, "playlist")?;
    Ok(playlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        helpers::thing_helpers::thing_id,
        models::playlist::LIKED_SONGS_NAME,
        test_utils::{create_user, setup_db},
    };

    #[tokio::test]
    async fn test_owned_playlist() {
        let db = setup_db().await;
        let alice = create_user(&db, "alice").await;
        let bob = create_user(&db, "bob").await;

        let alice_record = crate::helpers::user_helpers::get_user_record(&db, &thing_id(&alice))
            .await
            .unwrap();
        let liked_id = thing_id(&alice_record.liked_songs);

        let playlist = get_owned_playlist(&db, &liked_id, &thing_id(&alice))
            .await
            .unwrap();
        assert_eq!(playlist.name, LIKED_SONGS_NAME);

        let result = get_owned_playlist(&db, &liked_id, &thing_id(&bob)).await;
        assert!(matches!(result, Err(Error::Forbidden { .. })));

        let result = get_playlist(&db, "missing").await;
        assert!(matches!(result, Err(Error::PlaylistNotFound { .. })));
    }
}
