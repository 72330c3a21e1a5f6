use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::{
    controllers::{song_controller::SongController, user_controller::UserController},
    AppState,
};

pub struct UserRoutes;

impl UserRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route("/recommended", get(UserController::get_recommended))
            .route("/song/{song_id}", get(SongController::get_song_owner))
            .route(
                "/{user_id}",
                get(UserController::get_user).put(UserController::update_user),
            )
            .route("/{user_id}/followers", get(UserController::get_followers))
            .route("/{user_id}/following", get(UserController::get_following))
            .route(
                "/{user_id}/follow/{target_id}",
                post(UserController::follow).delete(UserController::unfollow),
            )
            .route(
                "/{user_id}/remove/{follower_id}",
                patch(UserController::remove_follower),
            )
    }
}
