use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use validator::Validate;

use crate::{
    dto::games::{
        ActionResponse, AddGameRequest, BannerRequest, CompletionRequest, ConfirmQuery,
        GameView, ListsResponse, MoveRequest, MoveResponse, ReleaseDateRequest,
    },
    error::AppError,
    services::game_service,
    state::{SharedState, game::ListKey},
};

/// Endpoints managing the four lists; request bodies may be up to `body_limit` bytes.
pub fn router(body_limit: usize) -> Router<SharedState> {
    Router::new()
        .route(
            "/api/games",
            get(list_games).post(add_game).delete(clear_all),
        )
        .route("/api/games/move", post(move_game))
        .route("/api/games/{list}/{id}", delete(remove_game))
        .route("/api/games/{list}/{id}/completion", put(update_completion))
        .route(
            "/api/games/{list}/{id}/release-date",
            put(update_release_date),
        )
        .route("/api/games/{list}/{id}/banner", put(update_banner))
        .layer(DefaultBodyLimit::max(body_limit))
}

#[utoipa::path(
    get,
    path = "/api/games",
    tag = "games",
    responses((status = 200, description = "All lists", body = ListsResponse))
)]
/// Return every list; the waiting list is ordered by release date.
pub async fn list_games(State(state): State<SharedState>) -> Json<ListsResponse> {
    Json(game_service::list_games(&state).await)
}

#[utoipa::path(
    post,
    path = "/api/games",
    tag = "games",
    request_body = AddGameRequest,
    responses(
        (status = 201, description = "Game added", body = GameView),
        (status = 400, description = "Invalid name or banner"),
        (status = 409, description = "A game with this name already exists"),
        (status = 413, description = "Banner too large")
    )
)]
/// Add a game to a list.
pub async fn add_game(
    State(state): State<SharedState>,
    Json(payload): Json<AddGameRequest>,
) -> Result<(StatusCode, Json<GameView>), AppError> {
    payload.validate()?;
    let game = game_service::add_game(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

#[utoipa::path(
    delete,
    path = "/api/games",
    tag = "games",
    params(ConfirmQuery),
    responses((status = 200, description = "Clear outcome", body = ActionResponse))
)]
/// Remove every game from every list. Requires `confirm=true`.
pub async fn clear_all(
    State(state): State<SharedState>,
    Query(query): Query<ConfirmQuery>,
) -> Json<ActionResponse> {
    Json(game_service::clear_all(&state, query.confirm).await)
}

#[utoipa::path(
    delete,
    path = "/api/games/{list}/{id}",
    tag = "games",
    params(
        ("list" = ListKey, Path, description = "List holding the game"),
        ("id" = String, Path, description = "Game identifier"),
        ConfirmQuery
    ),
    responses((status = 200, description = "Removal outcome", body = ActionResponse))
)]
/// Remove one game. Requires `confirm=true`.
pub async fn remove_game(
    State(state): State<SharedState>,
    Path((list, id)): Path<(ListKey, String)>,
    Query(query): Query<ConfirmQuery>,
) -> Json<ActionResponse> {
    Json(game_service::remove_game(&state, list, id, query.confirm).await)
}

#[utoipa::path(
    put,
    path = "/api/games/{list}/{id}/completion",
    tag = "games",
    params(
        ("list" = ListKey, Path, description = "List holding the game"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = CompletionRequest,
    responses((status = 200, description = "Update outcome", body = ActionResponse))
)]
/// Set the completion percentage (clamped into 0-100).
pub async fn update_completion(
    State(state): State<SharedState>,
    Path((list, id)): Path<(ListKey, String)>,
    Json(payload): Json<CompletionRequest>,
) -> Json<ActionResponse> {
    Json(game_service::update_completion(&state, list, id, payload).await)
}

#[utoipa::path(
    put,
    path = "/api/games/{list}/{id}/release-date",
    tag = "games",
    params(
        ("list" = ListKey, Path, description = "List holding the game"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = ReleaseDateRequest,
    responses(
        (status = 200, description = "Update outcome", body = ActionResponse),
        (status = 400, description = "Invalid release date; previous value kept")
    )
)]
/// Set or clear the release date.
pub async fn update_release_date(
    State(state): State<SharedState>,
    Path((list, id)): Path<(ListKey, String)>,
    Json(payload): Json<ReleaseDateRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        game_service::update_release_date(&state, list, id, payload).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/games/{list}/{id}/banner",
    tag = "games",
    params(
        ("list" = ListKey, Path, description = "List holding the game"),
        ("id" = String, Path, description = "Game identifier")
    ),
    request_body = BannerRequest,
    responses(
        (status = 200, description = "Update outcome", body = ActionResponse),
        (status = 413, description = "Banner too large")
    )
)]
/// Replace or remove the banner image.
pub async fn update_banner(
    State(state): State<SharedState>,
    Path((list, id)): Path<(ListKey, String)>,
    Json(payload): Json<BannerRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    payload.validate()?;
    Ok(Json(
        game_service::update_banner(&state, list, id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/games/move",
    tag = "games",
    request_body = MoveRequest,
    responses((status = 200, description = "Move outcome; unchanged when the game is not in the source list", body = MoveResponse))
)]
/// Move a game to a position in any list.
pub async fn move_game(
    State(state): State<SharedState>,
    Json(payload): Json<MoveRequest>,
) -> Json<MoveResponse> {
    Json(game_service::move_game(&state, payload).await)
}
