use std::{env, net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Request, Response},
    middleware, Router,
};
use surrealdb::{
    engine::any::{self, Any},
    opt::auth::Root,
    Surreal,
};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::Span;
use uuid::Uuid;

use crate::{
    auth::token_service::AuthConfig,
    models::database_helpers::define_schema,
    routes::{
        auth_routes::AuthRoutes, chart_routes::ChartRoutes, comment_routes::CommentRoutes,
        playlist_routes::PlaylistRoutes, post_routes::PostRoutes, search_routes::SearchRoutes,
        song_routes::SongRoutes, user_routes::UserRoutes,
    },
    services::{
        chart_service::{ChartConfig, ChartService},
        media_service::{MediaConfig, MediaStorage},
        recent_search_service::RecentSearchStore,
    },
};

pub use self::error::{Error, Result};

mod auth;
mod controllers;
mod error;
mod helpers;
mod middlewares;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_utils;

// Uploads carry a full audio file.
const MAX_BODY_BYTES: usize = 30 * 1024 * 1024;

#[derive(Clone)]
struct AppState {
    db: Surreal<Any>,
    auth_config: AuthConfig,
    recent_searches: RecentSearchStore,
    media: MediaStorage,
    chart: ChartService,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!("Starting BeatBond API...");

    let db_url = env::var("DB_URL")?;
    let db_ns = env::var("DB_NS")?;
    let db_name = env::var("DB_NAME")?;

    tracing::info!("Connecting to database at: {}", db_url);

    let db = any::connect(&db_url).await?;
    if let (Ok(username), Ok(password)) = (env::var("DB_USER"), env::var("DB_PASSWORD")) {
        db.signin(Root {
            username: &username,
            password: &password,
        })
        .await?;
    }
    db.use_ns(&db_ns).use_db(&db_name).await?;
    define_schema(&db).await?;

    tracing::info!("Database connected successfully!");

    let auth_config = AuthConfig::from_env()?;
    tracing::info!("Auth configuration loaded");

    let media = MediaStorage::new(MediaConfig::from_env());
    media.initialize().await?;
    tracing::info!("Serving media from {:?}", media.media_dir());

    let app_state = AppState {
        db,
        auth_config,
        recent_searches: RecentSearchStore::from_env(),
        media,
        chart: ChartService::new(ChartConfig::from_env()),
    };

    let host = env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(9000);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|_| Error::EnvVarError(format!("invalid bind address {host}:{port}")))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app(app_state)).await?;

    Ok(())
}

fn app(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .nest("/auth", AuthRoutes::routes())
        .nest("/spotify", ChartRoutes::routes());

    let protected_routes = Router::new()
        .nest("/users", UserRoutes::routes())
        .nest("/posts", PostRoutes::routes())
        .nest("/comments", CommentRoutes::routes())
        .nest("/songs", SongRoutes::routes())
        .nest("/playlist", PlaylistRoutes::routes())
        .nest("/search", SearchRoutes::routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::mw_auth::mw_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/assets", ServeDir::new(app_state.media.media_dir()))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4();
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    tracing::info!("{} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &Response<Body>, latency: Duration, _span: &Span| {
                    let status = response.status();
                    let latency_ms = latency.as_millis();

                    match status.as_u16() {
                        400..=499 => tracing::warn!("{} ({}ms)", status, latency_ms),
                        500..=599 => tracing::error!("{} ({}ms)", status, latency_ms),
                        _ => tracing::info!("{} ({}ms)", status, latency_ms),
                    }
                }),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("cross-origin"),
        ))
        .layer(CorsLayer::very_permissive())
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "beatbond_api=debug,tower_http=info,info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}
