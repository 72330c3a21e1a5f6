use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    controllers::SuccessResponse,
    error::Result,
    helpers::multipart_helpers::MultipartForm,
    middlewares::mw_auth::Ctx,
    models::{
        pagination::{PaginatedResponse, PaginationQuery},
        post::{CommentPayload, CreatePostRequest, PostLikeResponse, PostWithRelations},
    },
    services::post_service::PostService,
    AppState,
};

pub struct PostController;

impl PostController {
    pub async fn get_feed(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Query(query): Query<PaginationQuery>,
    ) -> Result<Json<PaginatedResponse<PostWithRelations>>> {
        let feed = PostService::get_feed(&state.db, &ctx.user_id, &query).await?;
        Ok(Json(feed))
    }

    pub async fn get_user_posts(
        State(state): State<AppState>,
        Path(user_id): Path<String>,
    ) -> Result<Json<Vec<PostWithRelations>>> {
        let posts = PostService::get_user_feed(&state.db, &user_id).await?;
        Ok(Json(posts))
    }

    pub async fn create_post(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        multipart: Multipart,
    ) -> Result<(StatusCode, Json<PostWithRelations>)> {
        let mut form = MultipartForm::from_multipart(multipart).await?;

        let request = CreatePostRequest {
            title: form.required_text("title")?,
            caption: form.text("caption"),
            audio: form.required_file("audio")?,
            picture: form.required_file("picture")?,
        };

        let post = PostService::create_post(&state.db, &state.media, &ctx.user, request).await?;

        Ok((StatusCode::CREATED, Json(post)))
    }

    pub async fn toggle_like(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(post_id): Path<String>,
    ) -> Result<Json<PostLikeResponse>> {
        let response = PostService::toggle_like(&state.db, &post_id, &ctx.user_id).await?;
        Ok(Json(response))
    }

    pub async fn add_comment(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(post_id): Path<String>,
        Json(payload): Json<CommentPayload>,
    ) -> Result<(StatusCode, Json<PostWithRelations>)> {
        let post = PostService::add_comment(&state.db, &post_id, &ctx.user_id, payload.text).await?;
        Ok((StatusCode::CREATED, Json(post)))
    }

    pub async fn delete_post(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(post_id): Path<String>,
    ) -> Result<Json<SuccessResponse>> {
        PostService::delete_post(&state.db, &state.media, &post_id, &ctx.user_id).await?;
        Ok(Json(SuccessResponse::ok()))
    }
}
