use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::models::{LoginPayload, LoginResponse, SignupRequest},
    error::Result,
    helpers::multipart_helpers::MultipartForm,
    models::user::UserProfile,
    services::auth_service::AuthService,
    AppState,
};

pub struct AuthController;

impl AuthController {
    pub async fn signup(
        State(state): State<AppState>,
        multipart: Multipart,
    ) -> Result<(StatusCode, Json<UserProfile>)> {
        let mut form = MultipartForm::from_multipart(multipart).await?;

        let request = SignupRequest {
            first_name: form.required_text("first_name")?,
            last_name: form.required_text("last_name")?,
            username: form.required_text("username")?,
            email: form.required_text("email")?,
            password: form.required_raw("password")?,
            picture: form.take_file("picture"),
        };

        let user = AuthService::signup(&state.db, &state.media, request).await?;

        Ok((StatusCode::CREATED, Json(user)))
    }

    pub async fn login(
        State(state): State<AppState>,
        Json(payload): Json<LoginPayload>,
    ) -> Result<Json<LoginResponse>> {
        let response =
            AuthService::login(&state.db, &state.auth_config, payload.email, payload.password)
                .await?;

        Ok(Json(response))
    }
}
