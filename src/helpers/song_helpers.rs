use surrealdb::{engine::any::Any, Surreal};

use crate::{
    error::{Error, Result},
    helpers::thing_helpers::{create_song_thing, parse_id_part},
    models::song::Song,
};

pub async fn get_song(db: &Surreal<Any>, song_id: &str) -> Result<Song> {
    let song: Option<Song> = db
        .query("SELECT * FROM $song")
        .bind(("song", create_song_thing(song_id)))
        .await?
        .take(0)?;

    song.ok_or_else(|| Error::SongNotFound {
        id: parse_id_part(song_id).to_string(),
    })
}

pub async fn song_exists(db: &Surreal<Any>, song_id: &str) -> Result<bool> {
    match get_song(db, song_id).await {
        Ok(_) => Ok(true),
        Err(Error::SongNotFound { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}
