use chrono::Utc;
use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use crate::{
    error::{Error, Result},
    helpers::{
        like_helpers,
        thing_helpers::{create_post_thing, create_user_thing, new_thing, parse_id_part, thing_id},
        user_helpers::{ensure_owner, get_user_record},
    },
    models::{
        comment::Comment,
        database_helpers::CountResult,
        like_set::LikeSet,
        pagination::{PaginatedResponse, PaginationInfo, PaginationQuery},
        post::{CreatePostRequest, Post, PostLikeResponse, PostWithRelations},
        song::Song,
        user::UserRecord,
    },
    services::{
        audio_service::{audio_duration_blocking, file_type_for},
        media_service::MediaStorage,
        song_service::SongService,
    },
};

/// Projection of a post with its owner (no password), its song and its
/// comments, each comment author reduced to id, username and picture.
pub(crate) const EXPANDED_POST_FIELDS: &str = r#"
    id, caption, likes, created_at,
    (SELECT * OMIT password FROM ONLY $parent.user) AS user,
    (SELECT * FROM ONLY $parent.song) AS song,
    (SELECT id, text, likes, replies, created_at,
        (SELECT id, username, picture_path FROM ONLY $parent.user) AS user
        FROM $parent.comments) AS comments
"#;

pub struct PostService;

impl PostService {
    pub(crate) async fn get_post_record(db: &Surreal<Any>, post_id: &str) -> Result<Post> {
        let post: Option<Post> = db
            .query("SELECT * FROM $post")
            .bind(("post", create_post_thing(post_id)))
            .await?
            .take(0)?;

        post.ok_or_else(|| Error::PostNotFound {
            id: parse_id_part(post_id).to_string(),
        })
    }

    pub async fn get_post(db: &Surreal<Any>, post_id: &str) -> Result<PostWithRelations> {
        let sql = format!("SELECT {EXPANDED_POST_FIELDS} FROM $post");
        let post: Option<PostWithRelations> = db
            .query(sql)
            .bind(("post", create_post_thing(post_id)))
            .await?
            .take(0)?;

        post.ok_or_else(|| Error::PostNotFound {
            id: parse_id_part(post_id).to_string(),
        })
    }

    /// Writes a song, the post built on it and the owner's back-references in
    /// one transaction.
    pub(crate) async fn persist_post(
        db: &Surreal<Any>,
        song_thing: Thing,
        song: Song,
        post_thing: Thing,
        post: Post,
    ) -> Result<()> {
        let sql = r#"
            BEGIN TRANSACTION;
            CREATE $song CONTENT $song_content;
            CREATE $post CONTENT $post_content;
            UPDATE $user SET songs += $song, posts += $post;
            COMMIT TRANSACTION;
        "#;

        db.query(sql)
            .bind(("user", post.user.clone()))
            .bind(("song", song_thing))
            .bind(("song_content", song))
            .bind(("post", post_thing))
            .bind(("post_content", post))
            .await?
            .check()?;
        Ok(())
    }

    /// Reads the audio duration, stores the uploaded audio and picture and
    /// persists song and post.
    ///
    /// Nothing is written to media storage until the audio has been read, and
    /// stored files are removed again if the records cannot be written.
    pub async fn create_post(
        db: &Surreal<Any>,
        media: &MediaStorage,
        author: &UserRecord,
        request: CreatePostRequest,
    ) -> Result<PostWithRelations> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(Error::InvalidInput {
                reason: "Song title cannot be empty".to_string(),
            });
        }

        let extension = request.audio.extension().unwrap_or_default();
        file_type_for(&extension)?;

        let author_thing = author.id.clone().ok_or_else(|| Error::UserNotFound {
            id: author.username.clone(),
        })?;

        let duration = audio_duration_blocking(request.audio.bytes.clone(), extension).await?;

        let audio = media.store(&request.audio).await?;
        let picture = match media.store(&request.picture).await {
            Ok(picture) => picture,
            Err(e) => {
                media.remove(&audio.key).await;
                return Err(e);
            }
        };

        let now = Utc::now();
        let song_thing = new_thing("song");
        let post_thing = new_thing("post");

        let song = Song {
            id: None,
            title,
            artist: author.username.clone(),
            file_path: audio.url.clone(),
            picture_path: picture.url.clone(),
            duration,
            user: author_thing.clone(),
            likes: LikeSet::default(),
            created_at: now.into(),
        };

        let post = Post {
            id: None,
            user: author_thing,
            song: song_thing.clone(),
            caption: request
                .caption
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            likes: LikeSet::default(),
            song_likes_granted: LikeSet::default(),
            comments: vec![],
            created_at: now.into(),
        };

        if let Err(e) = Self::persist_post(db, song_thing, song, post_thing.clone(), post).await {
            media.remove(&audio.key).await;
            media.remove(&picture.key).await;
            return Err(e);
        }
        tracing::info!("{} posted {}", author.username, post_thing);

        Self::get_post(db, &thing_id(&post_thing)).await
    }

    /// Posts of the users the viewer follows, and the viewer's own, newest
    /// first. Ties on `created_at` are broken by record id, descending.
    pub async fn get_feed(
        db: &Surreal<Any>,
        viewer_id: &str,
        query: &PaginationQuery,
    ) -> Result<PaginatedResponse<PostWithRelations>> {
        let viewer = get_user_record(db, viewer_id).await?;
        let (page, page_size) = query.resolve();
        let start = (page - 1) as u64 * page_size as u64;

        let mut authors = viewer.following;
        authors.push(create_user_thing(viewer_id));

        let sql = format!(
            r#"
            SELECT count() AS total FROM post WHERE user INSIDE $authors GROUP ALL;
            SELECT {EXPANDED_POST_FIELDS} FROM post
                WHERE user INSIDE $authors
                ORDER BY created_at DESC, id DESC
                LIMIT $limit START $start;
            "#
        );

        let mut res = db
            .query(sql)
            .bind(("authors", authors))
            .bind(("limit", page_size))
            .bind(("start", start))
            .await?;

        let count: Option<CountResult> = res.take(0)?;
        let data: Vec<PostWithRelations> = res.take(1)?;
        let total_items = count.map(|c| c.total).unwrap_or(0);

        Ok(PaginatedResponse {
            data,
            pagination: PaginationInfo::new(page, page_size, total_items),
        })
    }

    /// Every post of one user, same ordering and expansion as the feed.
    pub async fn get_user_feed(
        db: &Surreal<Any>,
        user_id: &str,
    ) -> Result<Vec<PostWithRelations>> {
        let user = get_user_record(db, user_id).await?;

        let sql = format!(
            "SELECT {EXPANDED_POST_FIELDS} FROM post WHERE user = $user ORDER BY created_at DESC, id DESC"
        );
        let posts: Vec<PostWithRelations> = db
            .query(sql)
            .bind(("user", user.id.unwrap_or_else(|| create_user_thing(user_id))))
            .await?
            .take(0)?;

        Ok(posts)
    }

    /// Toggles the caller's like on a post, carrying the song like with it.
    ///
    /// Liking the post likes the song too (and files it in Liked Songs).
    /// Unliking it takes the song like back only when this post added it, so
    /// a song the user had already liked stays liked.
    pub async fn toggle_like(
        db: &Surreal<Any>,
        post_id: &str,
        user_id: &str,
    ) -> Result<PostLikeResponse> {
        let post = create_post_thing(post_id);
        let liked = like_helpers::toggle_like(db, post.clone(), user_id)
            .await?
            .ok_or_else(|| Error::PostNotFound {
                id: parse_id_part(post_id).to_string(),
            })?;

        let record = Self::get_post_record(db, post_id).await?;
        if liked {
            if like_helpers::add_like(db, record.song.clone(), user_id).await? {
                Self::grant_song_like(db, post, user_id).await?;
            }
            SongService::align_liked_songs(db, record.song, user_id, true).await?;
        } else if Self::take_back_song_like(db, post, user_id).await? {
            like_helpers::set_like(db, record.song.clone(), user_id, false).await?;
            SongService::align_liked_songs(db, record.song, user_id, false).await?;
        }

        Ok(PostLikeResponse {
            liked,
            post: Self::get_post(db, post_id).await?,
        })
    }

    async fn grant_song_like(db: &Surreal<Any>, post: Thing, user_id: &str) -> Result<()> {
        db.query(
            "UPDATE $post SET song_likes_granted = array::union(song_likes_granted ?? [], [$user]);",
        )
        .bind(("post", post))
        .bind(("user", parse_id_part(user_id).to_string()))
        .await?
        .check()?;
        Ok(())
    }

    /// Clears the grant recorded by [`Self::grant_song_like`]. Returns whether
    /// there was one.
    async fn take_back_song_like(db: &Surreal<Any>, post: Thing, user_id: &str) -> Result<bool> {
        let sql = r#"
            UPDATE $post SET song_likes_granted = array::complement(song_likes_granted, [$user])
                WHERE $user INSIDE song_likes_granted
                RETURN VALUE id;
        "#;

        let updated: Vec<Thing> = db
            .query(sql)
            .bind(("post", post))
            .bind(("user", parse_id_part(user_id).to_string()))
            .await?
            .take(0)?;
        Ok(!updated.is_empty())
    }

    pub async fn add_comment(
        db: &Surreal<Any>,
        post_id: &str,
        user_id: &str,
        text: String,
    ) -> Result<PostWithRelations> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(Error::InvalidInput {
                reason: "Comment text cannot be empty".to_string(),
            });
        }

        let post = Self::get_post_record(db, post_id).await?;
        let comment_thing = new_thing("comment");

        let comment = Comment {
            id: None,
            user: create_user_thing(user_id),
            text,
            likes: LikeSet::default(),
            replies: vec![],
            created_at: Utc::now().into(),
        };

        let sql = r#"
            BEGIN TRANSACTION;
            CREATE $comment CONTENT $content;
            UPDATE $post SET comments += $comment;
            COMMIT TRANSACTION;
        "#;

        db.query(sql)
            .bind(("comment", comment_thing))
            .bind(("content", comment))
            .bind(("post", post.id.unwrap_or_else(|| create_post_thing(post_id))))
            .await?
            .check()?;

        Self::get_post(db, post_id).await
    }

    /// Removes a post with its song and comments, and every reference to them,
    /// in one transaction. Media files are removed afterwards, best effort.
    pub async fn delete_post(
        db: &Surreal<Any>,
        media: &MediaStorage,
        post_id: &str,
        user_id: &str,
    ) -> Result<()> {
        let post = Self::get_post_record(db, post_id).await?;
        ensure_owner(&post.user, user_id, "post")?;

        let song: Option<Song> = db
            .query("SELECT * FROM $song")
            .bind(("song", post.song.clone()))
            .await?
            .take(0)?;

        let sql = r#"
            BEGIN TRANSACTION;
            DELETE comment WHERE id INSIDE $comments;
            UPDATE playlist SET songs = array::complement(songs, [$song]) WHERE songs CONTAINS $song;
            UPDATE $owner SET
                posts = array::complement(posts, [$post]),
                songs = array::complement(songs, [$song]);
            DELETE $post;
            DELETE $song;
            COMMIT TRANSACTION;
        "#;

        db.query(sql)
            .bind(("comments", post.comments))
            .bind(("song", post.song))
            .bind(("owner", post.user))
            .bind(("post", create_post_thing(post_id)))
            .await?
            .check()?;

        if let Some(song) = song {
            media.remove_url(&song.file_path).await;
            media.remove_url(&song.picture_path).await;
        }

        tracing::info!("Deleted post {}", parse_id_part(post_id));
        Ok(())
    }
}
