use axum::Router;

use crate::state::SharedState;

/// Backup download and import.
pub mod backup;
/// Swagger UI and the OpenAPI document.
pub mod docs;
/// Drag gesture events.
pub mod drag;
/// List contents and game mutations.
pub mod games;
/// Counts and storage usage.
pub mod stats;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let settings = *state.settings();
    let api_router = games::router(settings.game_body_limit())
        .merge(drag::router())
        .merge(backup::router(settings.backup_body_limit()))
        .merge(stats::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
