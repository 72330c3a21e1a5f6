use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::Result, AppState};

pub struct ChartController;

impl ChartController {
    /// Provider playlist JSON, passed through unchanged.
    pub async fn get_playlist(
        State(state): State<AppState>,
        Path(playlist_id): Path<String>,
    ) -> Result<Json<serde_json::Value>> {
        let playlist = state.chart.get_playlist(&playlist_id).await?;
        Ok(Json(playlist))
    }
}
