use axum::{extract::State, http::Uri, Json};

use crate::error::{AppError, Result};
use crate::models::{QueueStatus, StatisticsSummary, VideoRecord};
use crate::services::InventoryService;
use crate::AppState;

/// Upload statistics
/// GET /api/statistics
pub async fn get_statistics(State(state): State<AppState>) -> Json<StatisticsSummary> {
    Json(InventoryService::compute_statistics(&state.uploads).await)
}

/// List uploaded videos
/// GET /api/videos
pub async fn list_videos(State(state): State<AppState>) -> Json<Vec<VideoRecord>> {
    let prefix = state.config.inventory.url_prefix();
    Json(InventoryService::list_videos(&state.uploads, &prefix).await)
}

/// Ingestion queue status
/// GET /api/queue
pub async fn get_queue_status(State(state): State<AppState>) -> Json<QueueStatus> {
    Json(InventoryService::queue_status(state.config.inventory.queue_capacity))
}

/// Unknown API paths answer with a JSON 404 instead of the frontend
pub async fn api_not_found(uri: Uri) -> Result<()> {
    Err(AppError::NotFound(uri.path().to_string()))
}
