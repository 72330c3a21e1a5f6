use serde::Serialize;

pub mod auth_controller;
pub mod chart_controller;
pub mod comment_controller;
pub mod playlist_controller;
pub mod post_controller;
pub mod search_controller;
pub mod song_controller;
pub mod user_controller;

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
