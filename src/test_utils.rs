//! Shared fixtures for unit and router tests.

use chrono::{DateTime, Utc};
use jsonwebtoken::Algorithm;
use surrealdb::{
    engine::any::{connect, Any},
    sql::Thing,
    Surreal,
};
use tempfile::TempDir;

use crate::{
    auth::token_service::{AuthConfig, TokenService},
    helpers::{
        thing_helpers::{new_thing, thing_id},
        user_helpers::get_user_record,
    },
    models::{database_helpers::define_schema, like_set::LikeSet, post::Post, song::Song, user::Privacy},
    services::{
        auth_service::{AuthService, NewAccount},
        chart_service::{ChartConfig, ChartService},
        media_service::{MediaConfig, MediaStorage},
        post_service::PostService,
        recent_search_service::RecentSearchStore,
        user_service::UserService,
    },
    AppState,
};

pub async fn setup_db() -> Surreal<Any> {
    let db = connect("mem://").await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    define_schema(&db).await.unwrap();
    db
}

/// Account with its Liked Songs playlist, email `<username>@beatbond.test`.
pub async fn create_user(db: &Surreal<Any>, username: &str) -> Thing {
    AuthService::create_account(db, NewAccount::for_username(username))
        .await
        .unwrap()
}

pub async fn create_post(db: &Surreal<Any>, owner: &Thing, title: &str) -> Thing {
    create_post_at(db, owner, title, Utc::now()).await
}

/// Song + post pair owned by `owner`, both stamped `created_at`.
pub async fn create_post_at(
    db: &Surreal<Any>,
    owner: &Thing,
    title: &str,
    created_at: DateTime<Utc>,
) -> Thing {
    let author = get_user_record(db, &thing_id(owner)).await.unwrap();
    let song_thing = new_thing("song");
    let post_thing = new_thing("post");

    let song = Song {
        id: None,
        title: title.to_string(),
        artist: author.username,
        file_path: format!("/assets/{}.mp3", thing_id(&song_thing)),
        picture_path: "/assets/cover.png".to_string(),
        duration: 180.0,
        user: owner.clone(),
        likes: LikeSet::default(),
        created_at: created_at.into(),
    };
    let post = Post {
        id: None,
        user: owner.clone(),
        song: song_thing.clone(),
        caption: None,
        likes: LikeSet::default(),
        song_likes_granted: LikeSet::default(),
        comments: vec![],
        created_at: created_at.into(),
    };

    PostService::persist_post(db, song_thing, song, post_thing.clone(), post)
        .await
        .unwrap();
    post_thing
}

pub async fn post_song(db: &Surreal<Any>, post: &Thing) -> Thing {
    PostService::get_post_record(db, &thing_id(post))
        .await
        .unwrap()
        .song
}

pub async fn follow(db: &Surreal<Any>, follower: &Thing, followed: &Thing) {
    let follower_id = thing_id(follower);
    UserService::follow(db, &follower_id, &follower_id, &thing_id(followed))
        .await
        .unwrap();
}

pub async fn set_privacy(db: &Surreal<Any>, user: &Thing, privacy: Privacy) {
    db.query("UPDATE $user SET privacy = $privacy")
        .bind(("user", user.clone()))
        .bind(("privacy", privacy.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        website_url: "http://localhost:3000".to_string(),
        token_duration_min: 5,
        jwt_algorithm: Algorithm::HS256,
    }
}

pub async fn test_media() -> (MediaStorage, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let media = MediaStorage::new(MediaConfig {
        media_dir: dir.path().to_path_buf(),
        base_url: "/assets/".to_string(),
    });
    media.initialize().await.unwrap();
    (media, dir)
}

/// Application state over a fresh in-memory database. The chart provider
/// points at a closed local port.
pub async fn test_state() -> (AppState, TempDir) {
    let (media, dir) = test_media().await;
    let state = AppState {
        db: setup_db().await,
        auth_config: test_auth_config(),
        recent_searches: RecentSearchStore::new(100),
        media,
        chart: ChartService::new(ChartConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            accounts_url: "http://127.0.0.1:9".to_string(),
            api_url: "http://127.0.0.1:9/v1".to_string(),
        }),
    };
    (state, dir)
}

/// `Bearer <token>` header value for `user`.
pub fn bearer(state: &AppState, user: &Thing) -> String {
    let token = TokenService::create_token(thing_id(user), &state.auth_config).unwrap();
    format!("Bearer {token}")
}

/// Minimal `multipart/form-data` body builder.
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "beatbond-test-boundary".to_string(),
            body: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, file_name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}
