pub mod like_helpers;
pub mod multipart_helpers;
pub mod playlist_helpers;
pub mod song_helpers;
pub mod thing_helpers;
pub mod user_helpers;
