use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::drag::{DragEventRequest, DragResponse},
    services::game_service,
    state::SharedState,
};

/// Drag-and-drop gesture endpoint.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/drag", post(drag_event))
}

#[utoipa::path(
    post,
    path = "/api/drag",
    tag = "drag",
    request_body = DragEventRequest,
    responses((status = 200, description = "Hover feedback and applied move", body = DragResponse))
)]
/// Feed one gesture event; a completed drop moves the game and persists the lists.
pub async fn drag_event(
    State(state): State<SharedState>,
    Json(payload): Json<DragEventRequest>,
) -> Json<DragResponse> {
    Json(game_service::handle_drag(&state, payload).await)
}
