use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    controllers::SuccessResponse,
    error::Result,
    middlewares::mw_auth::Ctx,
    models::{
        comment::{CommentLikeResponse, CommentWithAuthor},
        post::CommentPayload,
    },
    services::comment_service::CommentService,
    AppState,
};

pub struct CommentController;

impl CommentController {
    pub async fn toggle_like(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(comment_id): Path<String>,
    ) -> Result<Json<CommentLikeResponse>> {
        let response = CommentService::toggle_like(&state.db, &comment_id, &ctx.user_id).await?;
        Ok(Json(response))
    }

    pub async fn add_reply(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(comment_id): Path<String>,
        Json(payload): Json<CommentPayload>,
    ) -> Result<(StatusCode, Json<CommentWithAuthor>)> {
        let comment =
            CommentService::add_reply(&state.db, &comment_id, &ctx.user_id, payload.text).await?;
        Ok((StatusCode::CREATED, Json(comment)))
    }

    pub async fn delete_comment(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(comment_id): Path<String>,
    ) -> Result<Json<SuccessResponse>> {
        CommentService::delete_comment(&state.db, &comment_id, &ctx.user_id).await?;
        Ok(Json(SuccessResponse::ok()))
    }
}
