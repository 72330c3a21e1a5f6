pub mod auth_routes;
pub mod chart_routes;
pub mod comment_routes;
pub mod playlist_routes;
pub mod post_routes;
pub mod search_routes;
pub mod song_routes;
pub mod user_routes;
