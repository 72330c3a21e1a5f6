use axum::{routing::post, Router};

use crate::{controllers::auth_controller::AuthController, AppState};

pub struct AuthRoutes;

impl AuthRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route("/signup", post(AuthController::signup))
            .route("/login", post(AuthController::login))
    }
}
