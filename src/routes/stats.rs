use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{backup::StorageUsageResponse, games::StatsResponse},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Counters and storage indicators.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/storage", get(get_storage_usage))
}

#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "stats",
    responses((status = 200, description = "Per-list counts", body = StatsResponse))
)]
/// Return the number of games per list and overall.
pub async fn get_stats(State(state): State<SharedState>) -> Json<StatsResponse> {
    Json(game_service::stats(&state).await)
}

#[utoipa::path(
    get,
    path = "/api/storage",
    tag = "stats",
    responses(
        (status = 200, description = "Storage usage", body = StorageUsageResponse),
        (status = 503, description = "Storage backend unavailable")
    )
)]
/// Return how much of the storage budget is used.
pub async fn get_storage_usage(
    State(state): State<SharedState>,
) -> Result<Json<StorageUsageResponse>, AppError> {
    Ok(Json(game_service::storage_usage(&state).await?))
}
