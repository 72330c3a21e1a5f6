use axum::{
    routing::{get, put},
    Router,
};

use crate::{controllers::playlist_controller::PlaylistController, AppState};

pub struct PlaylistRoutes;

impl PlaylistRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route(
                "/",
                get(PlaylistController::get_my_playlists).post(PlaylistController::create_playlist),
            )
            .route(
                "/{playlist_id}",
                get(PlaylistController::get_playlist)
                    .put(PlaylistController::update_playlist)
                    .delete(PlaylistController::delete_playlist),
            )
            .route("/{playlist_id}/add-song", put(PlaylistController::add_song))
            .route(
                "/{playlist_id}/remove-song",
                put(PlaylistController::remove_song),
            )
            .route(
                "/{playlist_id}/togglePrivacy",
                put(PlaylistController::toggle_privacy),
            )
    }
}
