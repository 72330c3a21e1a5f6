use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{controllers::search_controller::SearchController, AppState};

pub struct SearchRoutes;

impl SearchRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route("/", get(SearchController::search))
            .route("/recent", post(SearchController::append_recent_search))
            .route("/recent/{user_id}", get(SearchController::get_recent_searches))
            .route("/clear", delete(SearchController::clear_recent_searches))
    }
}
