use serde::{Deserialize, Serialize};

use crate::{models::user::UserProfile, services::media_service::UploadedFile};

#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub picture: Option<UploadedFile>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}
