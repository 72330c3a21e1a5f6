use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::{controllers::post_controller::PostController, AppState};

pub struct PostRoutes;

impl PostRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route(
                "/",
                get(PostController::get_feed).post(PostController::create_post),
            )
            .route(
                "/{id}",
                get(PostController::get_user_posts).delete(PostController::delete_post),
            )
            .route("/{id}/like", patch(PostController::toggle_like))
            .route("/{id}/comment", post(PostController::add_comment))
    }
}
