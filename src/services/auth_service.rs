use chrono::Utc;
use lazy_regex::regex_is_match;
use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use crate::{
    auth::{
        models::{LoginResponse, SignupRequest},
        password_service,
        token_service::{AuthConfig, TokenService},
    },
    error::{Error, Result},
    helpers::{
        thing_helpers::{new_thing, thing_id},
        user_helpers::get_user_profile,
    },
    models::{
        like_set::LikeSet,
        playlist::{Playlist, DEFAULT_PLAYLIST_PICTURE, LIKED_SONGS_NAME},
        user::{Privacy, UserProfile, UserRecord, DEFAULT_PROFILE_PICTURE},
    },
    services::media_service::MediaStorage,
};

/// Fields of a brand-new account, password already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub picture_path: String,
}

pub struct AuthService;

impl AuthService {
    fn validate_signup(request: &SignupRequest) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidInput {
            reason: reason.to_string(),
        };

        for name in [&request.first_name, &request.last_name] {
            let len = name.chars().count();
            if !(2..=50).contains(&len) {
                return Err(invalid("Names must be between 2 and 50 characters"));
            }
        }
        if !regex_is_match!(r"^\S{3,20}$", &request.username) {
            return Err(invalid(
                "Username must be 3 to 20 characters without spaces",
            ));
        }
        if !regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", &request.email) {
            return Err(invalid("Invalid email address"));
        }
        Ok(())
    }

    async fn ensure_available(db: &Surreal<Any>, username: &str, email: &str) -> Result<()> {
        let sql = r#"
            SELECT VALUE id FROM user WHERE username = $username;
            SELECT VALUE id FROM user WHERE email = $email;
        "#;
        let mut res = db
            .query(sql)
            .bind(("username", username.to_string()))
            .bind(("email", email.to_string()))
            .await?;

        let by_username: Option<Thing> = res.take(0)?;
        if by_username.is_some() {
            return Err(Error::UserAlreadyExists {
                field: "username".to_string(),
            });
        }
        let by_email: Option<Thing> = res.take(1)?;
        if by_email.is_some() {
            return Err(Error::UserAlreadyExists {
                field: "email".to_string(),
            });
        }
        Ok(())
    }

    /// Creates the user and their "Liked Songs" playlist in one transaction.
    pub async fn create_account(db: &Surreal<Any>, account: NewAccount) -> Result<Thing> {
        let user_thing = new_thing("user");
        let liked_thing = new_thing("playlist");
        let now = Utc::now();

        let user = UserRecord {
            id: None,
            first_name: account.first_name,
            last_name: account.last_name,
            username: account.username,
            email: account.email,
            password: account.password_hash,
            picture_path: account.picture_path,
            followers: vec![],
            following: vec![],
            playlists: vec![liked_thing.clone()],
            songs: vec![],
            posts: vec![],
            liked_songs: liked_thing.clone(),
            privacy: Privacy::default(),
            created_at: now.into(),
        };

        let liked_songs = Playlist {
            id: None,
            name: LIKED_SONGS_NAME.to_string(),
            songs: vec![],
            privacy: Privacy::Private,
            user: user_thing.clone(),
            picture_path: DEFAULT_PLAYLIST_PICTURE.to_string(),
            description: String::new(),
            created_at: now.into(),
            updated_at: now.into(),
        };

        let sql = r#"
            BEGIN TRANSACTION;
            CREATE $user CONTENT $user_content;
            CREATE $playlist CONTENT $playlist_content;
            COMMIT TRANSACTION;
        "#;

        db.query(sql)
            .bind(("user", user_thing.clone()))
            .bind(("user_content", user))
            .bind(("playlist", liked_thing))
            .bind(("playlist_content", liked_songs))
            .await?
            .check()?;

        Ok(user_thing)
    }

    pub async fn signup(
        db: &Surreal<Any>,
        media: &MediaStorage,
        request: SignupRequest,
    ) -> Result<UserProfile> {
        Self::validate_signup(&request)?;
        Self::ensure_available(db, &request.username, &request.email).await?;

        let password_hash = password_service::hash_password(&request.password)?;

        let picture_path = match &request.picture {
            Some(picture) => media.store(picture).await?.url,
            None => media.url_for(DEFAULT_PROFILE_PICTURE),
        };

        let account = NewAccount {
            first_name: request.first_name,
            last_name: request.last_name,
            username: request.username,
            email: request.email,
            password_hash,
            picture_path: picture_path.clone(),
        };
        let user_thing = match Self::create_account(db, account).await {
            Ok(user_thing) => user_thing,
            Err(e) => {
                media.remove_url(&picture_path).await;
                return Err(e);
            }
        };

        tracing::info!("New account {}", user_thing);

        get_user_profile(db, &thing_id(&user_thing)).await
    }

    pub async fn login(
        db: &Surreal<Any>,
        config: &AuthConfig,
        email: String,
        password: String,
    ) -> Result<LoginResponse> {
        let user: Option<UserRecord> = db
            .query("SELECT * FROM user WHERE email = $email")
            .bind(("email", email.trim().to_string()))
            .await?
            .take(0)?;

        let user = user.ok_or(Error::LoginFail)?;

        if !password_service::verify_password(&password, &user.password)? {
            return Err(Error::LoginFail);
        }

        let user_thing = user.id.ok_or(Error::LoginFail)?;
        let user_id = thing_id(&user_thing);
        let token = TokenService::create_token(user_id.clone(), config)?;

        Ok(LoginResponse {
            token,
            user: get_user_profile(db, &user_id).await?,
        })
    }
}

impl NewAccount {
    #[cfg(test)]
    pub fn for_username(username: &str) -> Self {
        Self {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            username: username.to_string(),
            email: format!("{username}@beatbond.test"),
            password_hash: String::new(),
            picture_path: DEFAULT_PROFILE_PICTURE.to_string(),
        }
    }
}
