pub mod audio_service;
pub mod auth_service;
pub mod chart_service;
pub mod comment_service;
pub mod media_service;
pub mod playlist_service;
pub mod post_service;
pub mod recent_search_service;
pub mod search_service;
pub mod song_service;
pub mod user_service;
