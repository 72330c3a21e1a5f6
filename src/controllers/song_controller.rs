use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{
    controllers::SuccessResponse,
    error::Result,
    middlewares::mw_auth::Ctx,
    models::{
        playlist::PlaylistWithSongs,
        song::{SongLikeResponse, SongOwnerResponse},
    },
    services::song_service::SongService,
    AppState,
};

pub struct SongController;

impl SongController {
    pub async fn toggle_like(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(song_id): Path<String>,
    ) -> Result<Json<SongLikeResponse>> {
        let response = SongService::toggle_like(&state.db, &song_id, &ctx.user_id).await?;
        Ok(Json(response))
    }

    pub async fn get_liked_songs(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
    ) -> Result<Json<PlaylistWithSongs>> {
        let playlist = SongService::get_liked_songs(&state.db, &ctx.user_id).await?;
        Ok(Json(playlist))
    }

    pub async fn get_song_owner(
        State(state): State<AppState>,
        Path(song_id): Path<String>,
    ) -> Result<Json<SongOwnerResponse>> {
        let owner = SongService::get_song_owner(&state.db, &song_id).await?;
        Ok(Json(owner))
    }

    pub async fn delete_song(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(song_id): Path<String>,
    ) -> Result<Json<SuccessResponse>> {
        SongService::delete_song(&state.db, &state.media, &song_id, &ctx.user_id).await?;
        Ok(Json(SuccessResponse::ok()))
    }
}
