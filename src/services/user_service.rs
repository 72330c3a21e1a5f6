use lazy_regex::regex_is_match;
use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use crate::{
    error::{Error, Result},
    helpers::{
        thing_helpers::{create_user_thing, parse_id_part, thing_id},
        user_helpers::{ensure_same_user, get_user_profile, get_user_record, user_exists},
    },
    models::{
        post::PostWithSong,
        user::{FollowSummary, UpdateUserRequest, UserPage, UserProfile},
    },
    services::media_service::MediaStorage,
};

const RECOMMENDED_USERS: u32 = 5;

pub struct UserService;

impl UserService {
    /// Profile with the user's posts, each post carrying its song.
    pub async fn get_user_page(db: &Surreal<Any>, user_id: &str) -> Result<UserPage> {
        let user = get_user_profile(db, user_id).await?;

        let posts: Vec<PostWithSong> = db
            .query(
                r#"SELECT id, user, caption, likes, comments, created_at,
                    (SELECT * FROM ONLY $parent.song) AS song
                FROM post WHERE user = $user ORDER BY created_at DESC, id DESC"#,
            )
            .bind(("user", user.id.clone()))
            .await?
            .take(0)?;

        Ok(UserPage { user, posts })
    }

    /// Top users by follower count among those who posted at least once.
    pub async fn get_recommended(db: &Surreal<Any>) -> Result<Vec<UserProfile>> {
        let users: Vec<UserProfile> = db
            .query(
                r#"SELECT *, array::len(followers) AS follower_count OMIT password
                FROM user WHERE array::len(posts) > 0
                ORDER BY follower_count DESC LIMIT $limit"#,
            )
            .bind(("limit", RECOMMENDED_USERS))
            .await?
            .take(0)?;

        if users.is_empty() {
            return Err(Error::NoRecommendedUsers);
        }
        Ok(users)
    }

    async fn summaries(db: &Surreal<Any>, ids: Vec<Thing>) -> Result<Vec<FollowSummary>> {
        let users: Vec<FollowSummary> = db
            .query("SELECT id, username, picture_path, followers, following, playlists FROM $ids")
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn get_followers(db: &Surreal<Any>, user_id: &str) -> Result<Vec<FollowSummary>> {
        let user = get_user_record(db, user_id).await?;
        Self::summaries(db, user.followers).await
    }

    pub async fn get_following(db: &Surreal<Any>, user_id: &str) -> Result<Vec<FollowSummary>> {
        let user = get_user_record(db, user_id).await?;
        Self::summaries(db, user.following).await
    }

    pub async fn follow(
        db: &Surreal<Any>,
        caller_id: &str,
        user_id: &str,
        target_id: &str,
    ) -> Result<()> {
        ensure_same_user(caller_id, user_id)?;
        if parse_id_part(user_id) == parse_id_part(target_id) {
            return Err(Error::InvalidInput {
                reason: "You cannot follow yourself".to_string(),
            });
        }

        let user = get_user_record(db, user_id).await?;
        if !user_exists(db, target_id).await? {
            return Err(Error::UserNotFound {
                id: parse_id_part(target_id).to_string(),
            });
        }

        let target = create_user_thing(target_id);
        if user.following.contains(&target) {
            return Err(Error::AlreadyFollowing {
                target_id: thing_id(&target),
            });
        }

        let sql = r#"
            BEGIN TRANSACTION;
            UPDATE $user SET following = array::union(following, [$target]);
            UPDATE $target SET followers = array::union(followers, [$user]);
            COMMIT TRANSACTION;
        "#;

        db.query(sql)
            .bind(("user", create_user_thing(user_id)))
            .bind(("target", target))
            .await?
            .check()?;

        tracing::debug!("{} now follows {}", user.username, parse_id_part(target_id));
        Ok(())
    }

    pub async fn unfollow(
        db: &Surreal<Any>,
        caller_id: &str,
        user_id: &str,
        target_id: &str,
    ) -> Result<()> {
        ensure_same_user(caller_id, user_id)?;

        let user = get_user_record(db, user_id).await?;
        let target = create_user_thing(target_id);
        if !user.following.contains(&target) {
            return Err(Error::InvalidInput {
                reason: "You are not following this user".to_string(),
            });
        }

        Self::unlink(db, create_user_thing(user_id), target).await
    }

    /// Drops `follower_id` from `user_id`'s followers.
    pub async fn remove_follower(
        db: &Surreal<Any>,
        caller_id: &str,
        user_id: &str,
        follower_id: &str,
    ) -> Result<()> {
        ensure_same_user(caller_id, user_id)?;

        let user = get_user_record(db, user_id).await?;
        let follower = create_user_thing(follower_id);
        if !user.followers.contains(&follower) {
            return Err(Error::InvalidInput {
                reason: "This user is not one of your followers".to_string(),
            });
        }

        Self::unlink(db, follower, create_user_thing(user_id)).await
    }

    /// Removes the `follower -> followed` edge from both sides.
    async fn unlink(db: &Surreal<Any>, follower: Thing, followed: Thing) -> Result<()> {
        let sql = r#"
            BEGIN TRANSACTION;
            UPDATE $follower SET following = array::complement(following, [$followed]);
            UPDATE $followed SET followers = array::complement(followers, [$follower]);
            COMMIT TRANSACTION;
        "#;

        db.query(sql)
            .bind(("follower", follower))
            .bind(("followed", followed))
            .await?
            .check()?;
        Ok(())
    }

    pub async fn update_user(
        db: &Surreal<Any>,
        media: &MediaStorage,
        caller_id: &str,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserProfile> {
        ensure_same_user(caller_id, user_id)?;
        let current = get_user_record(db, user_id).await?;

        let mut changes = serde_json::Map::new();

        for (field, value) in [
            ("first_name", request.first_name),
            ("last_name", request.last_name),
        ] {
            if let Some(value) = value {
                let value = value.trim().to_string();
                if !(2..=50).contains(&value.chars().count()) {
                    return Err(Error::InvalidInput {
                        reason: "Names must be between 2 and 50 characters".to_string(),
                    });
                }
                changes.insert(field.into(), value.into());
            }
        }

        if let Some(username) = request.username {
            let username = username.trim().to_string();
            if !regex_is_match!(r"^\S{3,20}$", &username) {
                return Err(Error::InvalidInput {
                    reason: "Username must be 3 to 20 characters without spaces".to_string(),
                });
            }
            if username != current.username {
                let taken: Option<Thing> = db
                    .query("SELECT VALUE id FROM user WHERE username = $username")
                    .bind(("username", username.clone()))
                    .await?
                    .take(0)?;
                if taken.is_some() {
                    return Err(Error::UserAlreadyExists {
                        field: "username".to_string(),
                    });
                }
            }
            changes.insert("username".into(), username.into());
        }

        if let Some(privacy) = request.privacy {
            changes.insert("privacy".into(), privacy.to_string().into());
        }

        let new_picture = request.picture_path.is_some();
        if let Some(picture_path) = request.picture_path {
            changes.insert("picture_path".into(), picture_path.into());
        }

        if !changes.is_empty() {
            db.query("UPDATE $user MERGE $changes RETURN NONE")
                .bind(("user", create_user_thing(user_id)))
                .bind(("changes", serde_json::Value::Object(changes)))
                .await?
                .check()?;

            if new_picture {
                media.remove_url(&current.picture_path).await;
            }
        }

        get_user_profile(db, user_id).await
    }
}
