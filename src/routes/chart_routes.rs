use axum::{routing::get, Router};

use crate::{controllers::chart_controller::ChartController, AppState};

pub struct ChartRoutes;

impl ChartRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new().route("/playlist/{playlist_id}", get(ChartController::get_playlist))
    }
}
