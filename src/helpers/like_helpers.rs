use serde::Deserialize;
use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use crate::{error::Result, helpers::thing_helpers::parse_id_part, models::like_set::LikeSet};

#[derive(Deserialize)]
struct LikesRow {
    likes: LikeSet,
}

/// Flips `user_id`'s membership in the `likes` set of `target`.
///
/// The read-modify-write runs inside one `UPDATE` statement, so concurrent
/// toggles are serialised by the database. Returns the new membership, or
/// `None` when `target` does not exist.
pub async fn toggle_like(db: &Surreal<Any>, target: Thing, user_id: &str) -> Result<Option<bool>> {
    let user_id = parse_id_part(user_id).to_string();

    let sql = r#"
        UPDATE $target SET likes = IF $user INSIDE likes
            THEN array::complement(likes, [$user])
            ELSE array::append(likes, $user)
        END
        RETURN likes;
    "#;

    let mut response = db
        .query(sql)
        .bind(("target", target))
        .bind(("user", user_id.clone()))
        .await?;
    let row: Option<LikesRow> = response.take(0)?;

    Ok(row.map(|row| {
        tracing::debug!("Like set now has {} members", row.likes.len());
        row.likes.contains(&user_id)
    }))
}

/// Adds `user_id` to the `likes` set of `target` unless it is already there.
/// Returns whether this call added it.
pub async fn add_like(db: &Surreal<Any>, target: Thing, user_id: &str) -> Result<bool> {
    let sql = r#"
        UPDATE $target SET likes = array::append(likes, $user)
            WHERE $user NOTINSIDE likes
            RETURN VALUE id;
    "#;

    let updated: Vec<Thing> = db
        .query(sql)
        .bind(("target", target))
        .bind(("user", parse_id_part(user_id).to_string()))
        .await?
        .take(0)?;
    Ok(!updated.is_empty())
}

/// Puts `user_id` into (or takes it out of) the `likes` set of `target`,
/// whatever its current state. Idempotent.
pub async fn set_like(db: &Surreal<Any>, target: Thing, user_id: &str, liked: bool) -> Result<()> {
    let sql = if liked {
        "UPDATE $target SET likes = array::union(likes, [$user]);"
    } else {
        "UPDATE $target SET likes = array::complement(likes, [$user]);"
    };

    db.query(sql)
        .bind(("target", target))
        .bind(("user", parse_id_part(user_id).to_string()))
        .await?
        .check()?;
    Ok(())
}
