use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the backlog tracker.
#[openapi(
    paths(
        crate::routes::games::list_games,
        crate::routes::games::add_game,
        crate::routes::games::clear_all,
        crate::routes::games::remove_game,
        crate::routes::games::update_completion,
        crate::routes::games::update_release_date,
        crate::routes::games::update_banner,
        crate::routes::games::move_game,
        crate::routes::drag::drag_event,
        crate::routes::backup::export_backup,
        crate::routes::backup::import_backup,
        crate::routes::stats::get_stats,
        crate::routes::stats::get_storage_usage,
    ),
    components(
        schemas(
            crate::state::game::ListKey,
            crate::dto::games::GameView,
            crate::dto::games::ListsResponse,
            crate::dto::games::StatsResponse,
            crate::dto::games::AddGameRequest,
            crate::dto::games::BannerInput,
            crate::dto::games::ActionResponse,
            crate::dto::drag::DragEventRequest,
            crate::dto::drag::DragResponse,
            crate::dto::backup::ImportResponse,
            crate::dto::backup::StorageUsageResponse,
        )
    ),
    tags(
        (name = "games", description = "Managing the four lists"),
        (name = "drag", description = "Drag-and-drop reordering"),
        (name = "backup", description = "Backup export and import"),
        (name = "stats", description = "Counters and storage usage"),
    )
)]
pub struct ApiDoc;
