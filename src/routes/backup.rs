use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    dto::backup::ImportResponse, error::AppError, services::game_service, state::SharedState,
};

/// Backup export and import endpoints; imports may be up to `body_limit` bytes.
pub fn router(body_limit: usize) -> Router<SharedState> {
    Router::new()
        .route("/api/backup", get(export_backup).post(import_backup))
        .layer(DefaultBodyLimit::max(body_limit))
}

#[utoipa::path(
    get,
    path = "/api/backup",
    tag = "backup",
    responses(
        (status = 200, description = "Backup document as a download", body = String, content_type = "application/json"),
        (status = 503, description = "Backup could not be built")
    )
)]
/// Download every list and the stored reviews as a versioned JSON document.
pub async fn export_backup(State(state): State<SharedState>) -> Result<Response, AppError> {
    let file = game_service::export_backup(&state).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/api/backup",
    tag = "backup",
    request_body(content = String, content_type = "application/json", description = "Backup document"),
    responses(
        (status = 200, description = "Backup imported", body = ImportResponse),
        (status = 400, description = "Document rejected; nothing changed"),
        (status = 413, description = "Document larger than the storage capacity")
    )
)]
/// Replace every list with the content of a backup document.
pub async fn import_backup(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ImportResponse>, AppError> {
    Ok(Json(game_service::import_backup(&state, &body).await?))
}
