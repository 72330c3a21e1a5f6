use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::{controllers::song_controller::SongController, AppState};

pub struct SongRoutes;

impl SongRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route("/likedSongs", get(SongController::get_liked_songs))
            .route("/{song_id}/like", put(SongController::toggle_like))
            .route("/{song_id}", delete(SongController::delete_song))
    }
}
