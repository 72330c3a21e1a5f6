use axum::{
    routing::{delete, patch, post},
    Router,
};

use crate::{controllers::comment_controller::CommentController, AppState};

pub struct CommentRoutes;

impl CommentRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route("/{comment_id}/like", patch(CommentController::toggle_like))
            .route("/{comment_id}/reply", post(CommentController::add_reply))
            .route("/{comment_id}", delete(CommentController::delete_comment))
    }
}
