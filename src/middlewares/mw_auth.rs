use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    auth::token_service::{Claims, TokenService},
    error::{Error, Result},
    helpers::{thing_helpers::parse_id_part, user_helpers::get_user_record},
    models::user::UserRecord,
    AppState,
};

/// Authenticated caller, inserted into request extensions by [`mw_auth`].
#[derive(Debug, Clone)]
pub struct Ctx {
    /// Plain user id, without the `user:` prefix.
    pub user_id: String,
    pub exp: usize,
    pub user: UserRecord,
}

impl Ctx {
    pub fn new(user_id: String, exp: usize, user: UserRecord) -> Self {
        Self { user_id, exp, user }
    }
}

pub async fn mw_auth(
    State(app_state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(Error::AuthFailNoAuthToken)?;

    let claims: Claims = TokenService::validate_token(token, &app_state.auth_config)?;
    let user_id = parse_id_part(&claims.sub).to_string();

    // A token for a deleted account is no better than a forged one.
    let user = match get_user_record(&app_state.db, &user_id).await {
        Ok(user) => user,
        Err(Error::UserNotFound { .. }) => return Err(Error::AuthFailInvalidToken),
        Err(e) => return Err(e),
    };

    req.extensions_mut()
        .insert(Ctx::new(user_id, claims.exp, user));

    Ok(next.run(req).await)
}
