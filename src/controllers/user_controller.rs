use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};

use crate::{
    controllers::SuccessResponse,
    error::Result,
    helpers::{multipart_helpers::MultipartForm, user_helpers::ensure_same_user},
    middlewares::mw_auth::Ctx,
    models::user::{FollowSummary, Privacy, UpdateUserRequest, UserPage, UserProfile},
    services::user_service::UserService,
    AppState,
};

pub struct UserController;

impl UserController {
    pub async fn get_user(
        State(state): State<AppState>,
        Path(user_id): Path<String>,
    ) -> Result<Json<UserPage>> {
        let page = UserService::get_user_page(&state.db, &user_id).await?;
        Ok(Json(page))
    }

    pub async fn get_recommended(State(state): State<AppState>) -> Result<Json<Vec<UserProfile>>> {
        let users = UserService::get_recommended(&state.db).await?;
        Ok(Json(users))
    }

    pub async fn get_followers(
        State(state): State<AppState>,
        Path(user_id): Path<String>,
    ) -> Result<Json<Vec<FollowSummary>>> {
        let followers = UserService::get_followers(&state.db, &user_id).await?;
        Ok(Json(followers))
    }

    pub async fn get_following(
        State(state): State<AppState>,
        Path(user_id): Path<String>,
    ) -> Result<Json<Vec<FollowSummary>>> {
        let following = UserService::get_following(&state.db, &user_id).await?;
        Ok(Json(following))
    }

    pub async fn follow(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path((user_id, target_id)): Path<(String, String)>,
    ) -> Result<Json<SuccessResponse>> {
        UserService::follow(&state.db, &ctx.user_id, &user_id, &target_id).await?;
        Ok(Json(SuccessResponse::ok()))
    }

    pub async fn unfollow(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path((user_id, target_id)): Path<(String, String)>,
    ) -> Result<Json<SuccessResponse>> {
        UserService::unfollow(&state.db, &ctx.user_id, &user_id, &target_id).await?;
        Ok(Json(SuccessResponse::ok()))
    }

    pub async fn remove_follower(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path((user_id, follower_id)): Path<(String, String)>,
    ) -> Result<Json<SuccessResponse>> {
        UserService::remove_follower(&state.db, &ctx.user_id, &user_id, &follower_id).await?;
        Ok(Json(SuccessResponse::ok()))
    }

    pub async fn update_user(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(user_id): Path<String>,
        multipart: Multipart,
    ) -> Result<Json<UserProfile>> {
        let mut form = MultipartForm::from_multipart(multipart).await?;

        let privacy = form
            .text("privacy")
            .map(|value| value.parse::<Privacy>())
            .transpose()?;

        ensure_same_user(&ctx.user_id, &user_id)?;
        let picture_path = match form.take_file("picture") {
            Some(file) => Some(state.media.store(&file).await?.url),
            None => None,
        };

        let request = UpdateUserRequest {
            first_name: form.text("first_name"),
            last_name: form.text("last_name"),
            username: form.text("username"),
            privacy,
            picture_path: picture_path.clone(),
        };

        let result =
            UserService::update_user(&state.db, &state.media, &ctx.user_id, &user_id, request)
                .await;
        if let (Err(_), Some(url)) = (&result, &picture_path) {
            state.media.remove_url(url).await;
        }
        Ok(Json(result?))
    }
}
