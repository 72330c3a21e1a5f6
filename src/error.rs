use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Clone, Debug, Serialize, strum_macros::AsRefStr)]
#[serde(tag = "type", content = "data")]
pub enum Error {
    LoginFail,

    // -- Auth errors.
    AuthFailNoAuthToken,
    AuthFailInvalidToken,

    // -- Input errors.
    InvalidInput { reason: String },
    UnsupportedAudioFormat { extension: String },
    AudioMetadata(String),

    // -- Ownership errors.
    Forbidden { reason: String },

    // -- Conflicts.
    UserAlreadyExists { field: String },
    SongAlreadyInPlaylist { song_id: String, playlist_id: String },
    AlreadyFollowing { target_id: String },

    // -- Lookups.
    UserNotFound { id: String },
    NoRecommendedUsers,
    PostNotFound { id: String },
    SongNotFound { id: String },
    CommentNotFound { id: String },
    PlaylistNotFound { id: String },

    // -- Upstream / infrastructure.
    DbError(String),
    MediaStorageError(String),
    ChartProviderError(String),
    EnvVarError(String),
    TokenCreationError(String),
    PasswordHashError(String),
}

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, client_error) = self.client_status_and_error();

        if status_code.is_server_error() {
            tracing::error!("{}: {}", self.as_ref(), self);
        } else {
            tracing::debug!("{}: {}", self.as_ref(), self);
        }

        let response_body = serde_json::json!({
            "error": client_error.as_ref(),
            "message": self.to_string()
        });

        (status_code, Json(response_body)).into_response()
    }
}

impl Error {
    pub fn client_status_and_error(&self) -> (StatusCode, ClientError) {
        match self {
            Self::LoginFail => (StatusCode::BAD_REQUEST, ClientError::LOGIN_FAIL),

            Self::AuthFailNoAuthToken | Self::AuthFailInvalidToken => {
                (StatusCode::FORBIDDEN, ClientError::NO_AUTH)
            }

            Self::InvalidInput { .. }
            | Self::UnsupportedAudioFormat { .. }
            | Self::AudioMetadata(_) => (StatusCode::BAD_REQUEST, ClientError::INVALID_PARAMS),

            Self::Forbidden { .. } => (StatusCode::FORBIDDEN, ClientError::FORBIDDEN),

            Self::UserAlreadyExists { .. }
            | Self::SongAlreadyInPlaylist { .. }
            | Self::AlreadyFollowing { .. } => (StatusCode::BAD_REQUEST, ClientError::CONFLICT),

            Self::UserNotFound { .. }
            | Self::NoRecommendedUsers
            | Self::PostNotFound { .. }
            | Self::SongNotFound { .. }
            | Self::CommentNotFound { .. }
            | Self::PlaylistNotFound { .. } => {
                (StatusCode::NOT_FOUND, ClientError::RESOURCE_NOT_FOUND)
            }

            Self::DbError(_)
            | Self::MediaStorageError(_)
            | Self::ChartProviderError(_)
            | Self::EnvVarError(_)
            | Self::TokenCreationError(_)
            | Self::PasswordHashError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::SERVICE_ERROR,
            ),
        }
    }
}

#[derive(Debug, strum_macros::AsRefStr)]
#[allow(non_camel_case_types)]
pub enum ClientError {
    LOGIN_FAIL,
    NO_AUTH,
    INVALID_PARAMS,
    FORBIDDEN,
    CONFLICT,
    SERVICE_ERROR,
    RESOURCE_NOT_FOUND,
}

impl From<surrealdb::Error> for Error {
    fn from(err: surrealdb::Error) -> Self {
        Error::DbError(err.to_string())
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::EnvVarError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidKeyFormat => {
                Error::TokenCreationError(err.to_string())
            }
            _ => Error::AuthFailInvalidToken,
        }
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::PasswordHashError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::MediaStorageError(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::ChartProviderError(err.to_string())
    }
}

impl From<MultipartError> for Error {
    fn from(err: MultipartError) -> Self {
        Error::InvalidInput {
            reason: err.body_text(),
        }
    }
}

impl From<lofty::error::LoftyError> for Error {
    fn from(err: lofty::error::LoftyError) -> Self {
        Error::AudioMetadata(err.to_string())
    }
}
