use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    controllers::SuccessResponse,
    error::Result,
    helpers::{multipart_helpers::MultipartForm, playlist_helpers::get_owned_playlist},
    middlewares::mw_auth::Ctx,
    models::playlist::{
        Playlist, PlaylistSongRequest, PlaylistWithOwner, PlaylistWithSongs,
        UpdatePlaylistRequest,
    },
    services::playlist_service::PlaylistService,
    AppState,
};

pub struct PlaylistController;

impl PlaylistController {
    pub async fn create_playlist(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
    ) -> Result<(StatusCode, Json<Playlist>)> {
        let playlist = PlaylistService::create_playlist(&state.db, &ctx.user_id).await?;
        Ok((StatusCode::CREATED, Json(playlist)))
    }

    /// Playlists of the connected user.
    pub async fn get_my_playlists(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
    ) -> Result<Json<Vec<PlaylistWithOwner>>> {
        let playlists = PlaylistService::get_user_playlists(&state.db, &ctx.user_id).await?;
        Ok(Json(playlists))
    }

    pub async fn get_playlist(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(playlist_id): Path<String>,
    ) -> Result<Json<PlaylistWithSongs>> {
        let playlist = PlaylistService::get_playlist(&state.db, &ctx.user_id, &playlist_id).await?;
        Ok(Json(playlist))
    }

    pub async fn update_playlist(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(playlist_id): Path<String>,
        multipart: Multipart,
    ) -> Result<Json<Playlist>> {
        let mut form = MultipartForm::from_multipart(multipart).await?;

        // Nothing reaches media storage for a playlist the caller cannot edit.
        get_owned_playlist(&state.db, &playlist_id, &ctx.user_id).await?;
        let picture_path = match form.take_file("picture") {
            Some(file) => Some(state.media.store(&file).await?.url),
            None => None,
        };

        let request = UpdatePlaylistRequest {
            name: form.text("name"),
            description: form.text("description"),
            picture_path: picture_path.clone(),
        };

        let result = PlaylistService::update_playlist(
            &state.db,
            &state.media,
            &ctx.user_id,
            &playlist_id,
            request,
        )
        .await;
        if let (Err(_), Some(url)) = (&result, &picture_path) {
            state.media.remove_url(url).await;
        }
        Ok(Json(result?))
    }

    pub async fn add_song(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(playlist_id): Path<String>,
        Json(payload): Json<PlaylistSongRequest>,
    ) -> Result<Json<Playlist>> {
        let playlist =
            PlaylistService::add_song(&state.db, &ctx.user_id, &playlist_id, &payload.song_id)
                .await?;
        Ok(Json(playlist))
    }

    pub async fn remove_song(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(playlist_id): Path<String>,
        Json(payload): Json<PlaylistSongRequest>,
    ) -> Result<Json<Playlist>> {
        let playlist =
            PlaylistService::remove_song(&state.db, &ctx.user_id, &playlist_id, &payload.song_id)
                .await?;
        Ok(Json(playlist))
    }

    pub async fn toggle_privacy(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(playlist_id): Path<String>,
    ) -> Result<Json<Playlist>> {
        let playlist =
            PlaylistService::toggle_privacy(&state.db, &ctx.user_id, &playlist_id).await?;
        Ok(Json(playlist))
    }

    pub async fn delete_playlist(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(playlist_id): Path<String>,
    ) -> Result<Json<SuccessResponse>> {
        PlaylistService::delete_playlist(&state.db, &state.media, &ctx.user_id, &playlist_id)
            .await?;
        Ok(Json(SuccessResponse::ok()))
    }
}
