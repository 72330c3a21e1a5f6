use chrono::Utc;
use surrealdb::{engine::any::Any, Surreal};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    helpers::{
        like_helpers,
        thing_helpers::{create_comment_thing, create_user_thing, parse_id_part},
        user_helpers::ensure_owner,
    },
    models::{
        comment::{Comment, CommentLikeResponse, CommentWithAuthor, Reply},
        like_set::LikeSet,
    },
};

const COMMENT_WITH_AUTHOR_FIELDS: &str = r#"
    id, text, likes, replies, created_at,
    (SELECT id, username, picture_path FROM ONLY $parent.user) AS user
"#;

pub struct CommentService;

impl CommentService {
    fn not_found(comment_id: &str) -> Error {
        Error::CommentNotFound {
            id: parse_id_part(comment_id).to_string(),
        }
    }

    fn validate_text(text: String) -> Result<String> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(Error::InvalidInput {
                reason: "Comment text cannot be empty".to_string(),
            });
        }
        Ok(text)
    }

    pub async fn get_comment(db: &Surreal<Any>, comment_id: &str) -> Result<CommentWithAuthor> {
        let sql = format!("SELECT {COMMENT_WITH_AUTHOR_FIELDS} FROM $comment");
        let comment: Option<CommentWithAuthor> = db
            .query(sql)
            .bind(("comment", create_comment_thing(comment_id)))
            .await?
            .take(0)?;

        comment.ok_or_else(|| Self::not_found(comment_id))
    }

    pub async fn toggle_like(
        db: &Surreal<Any>,
        comment_id: &str,
        user_id: &str,
    ) -> Result<CommentLikeResponse> {
        let liked = like_helpers::toggle_like(db, create_comment_thing(comment_id), user_id)
            .await?
            .ok_or_else(|| Self::not_found(comment_id))?;

        Ok(CommentLikeResponse {
            message: if liked { "Comment liked" } else { "Comment unliked" }.to_string(),
            comment: Self::get_comment(db, comment_id).await?,
        })
    }

    /// Appends a reply to the comment's embedded list. Replies are leaves.
    pub async fn add_reply(
        db: &Surreal<Any>,
        comment_id: &str,
        user_id: &str,
        text: String,
    ) -> Result<CommentWithAuthor> {
        let reply = Reply {
            id: Uuid::new_v4().simple().to_string(),
            user: create_user_thing(user_id),
            text: Self::validate_text(text)?,
            likes: LikeSet::default(),
            timestamp: Utc::now().into(),
        };

        let updated: Option<Comment> = db
            .query("UPDATE $comment SET replies = array::append(replies, $reply) RETURN AFTER")
            .bind(("comment", create_comment_thing(comment_id)))
            .bind(("reply", reply))
            .await?
            .take(0)?;

        if updated.is_none() {
            return Err(Self::not_found(comment_id));
        }

        Self::get_comment(db, comment_id).await
    }

    /// Owner-only. Pulls the comment from whichever post references it and
    /// deletes it, in one transaction.
    pub async fn delete_comment(
        db: &Surreal<Any>,
        comment_id: &str,
        requester_id: &str,
    ) -> Result<()> {
        let comment: Option<Comment> = db
            .query("SELECT * FROM $comment")
            .bind(("comment", create_comment_thing(comment_id)))
            .await?
            .take(0)?;
        let comment = comment.ok_or_else(|| Self::not_found(comment_id))?;

        ensure_owner(&comment.user, requester_id, "comment")?;

        let sql = r#"
            BEGIN TRANSACTION;
            UPDATE post SET comments = array::complement(comments, [$comment]) WHERE comments CONTAINS $comment;
            DELETE $comment;
            COMMIT TRANSACTION;
        "#;

        db.query(sql)
            .bind(("comment", create_comment_thing(comment_id)))
            .await?
            .check()?;

        tracing::debug!("Deleted comment {}", parse_id_part(comment_id));
        Ok(())
    }
}
