use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    helpers::{thing_helpers::parse_id_part, user_helpers::ensure_same_user},
    middlewares::mw_auth::Ctx,
    models::search::{
        AppendRecentSearchRequest, RecentSearchesResponse, SearchQuery, SearchResult,
    },
    services::search_service::SearchService,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct ClearRecentQuery {
    pub user_id: Option<String>,
}

pub struct SearchController;

impl SearchController {
    pub async fn search(
        State(state): State<AppState>,
        Query(params): Query<SearchQuery>,
    ) -> Result<Json<SearchResult>> {
        let result = SearchService::search(&state.db, &params.text, params.filter).await?;
        Ok(Json(result))
    }

    pub async fn get_recent_searches(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Path(user_id): Path<String>,
    ) -> Result<Json<RecentSearchesResponse>> {
        ensure_same_user(&ctx.user_id, &user_id)?;

        let recent_searches = state.recent_searches.list(&ctx.user_id).await;
        Ok(Json(RecentSearchesResponse { recent_searches }))
    }

    pub async fn append_recent_search(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Json(payload): Json<AppendRecentSearchRequest>,
    ) -> Result<Json<RecentSearchesResponse>> {
        if let Some(user_id) = &payload.user_id {
            ensure_same_user(&ctx.user_id, user_id)?;
        }

        tracing::debug!(
            "Recent search {:?} {} for {}",
            payload.new_search_item.kind,
            parse_id_part(&payload.new_search_item.id),
            ctx.user.username
        );

        let recent_searches = state
            .recent_searches
            .append(&ctx.user_id, payload.new_search_item)
            .await;
        Ok(Json(RecentSearchesResponse { recent_searches }))
    }

    pub async fn clear_recent_searches(
        State(state): State<AppState>,
        Extension(ctx): Extension<Ctx>,
        Query(params): Query<ClearRecentQuery>,
    ) -> Result<Json<RecentSearchesResponse>> {
        if let Some(user_id) = &params.user_id {
            ensure_same_user(&ctx.user_id, user_id)?;
        }

        state.recent_searches.clear(&ctx.user_id).await;
        Ok(Json(RecentSearchesResponse {
            recent_searches: vec![],
        }))
    }
}
