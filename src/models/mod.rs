pub mod comment;
pub mod like_set;
pub mod playlist;
pub mod post;
pub mod search;
pub mod song;
pub mod user;

pub mod database_helpers;
pub mod pagination;
