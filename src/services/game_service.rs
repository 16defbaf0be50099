//! Service helpers that run tracker operations against the shared state and shape DTOs.

use tracing::debug;

use crate::{
    dao::persistence::ExportFile,
    dto::{
        backup::{ImportResponse, StorageUsageResponse},
        drag::{DragEventRequest, DragResponse},
        games::{
            ActionResponse, AddGameRequest, BannerRequest, CompletionRequest, GameView,
            ListsResponse, MoveRequest, MoveResponse, ReleaseDateRequest, StatsResponse,
        },
    },
    error::ServiceError,
    services::tracker_service::Confirmation,
    state::{
        SharedState,
        game::{BannerImage, GameId, ListKey},
    },
};

fn outcome(changed: bool, done: &str, missed: &str) -> ActionResponse {
    ActionResponse {
        message: if changed { done } else { missed }.to_owned(),
        changed,
    }
}

/// Return every list: `toPlay` numbered, `waiting` in release order with countdowns.
pub async fn list_games(state: &SharedState) -> ListsResponse {
    let tracker = state.tracker().await;
    let lists = tracker.snapshot();
    let views = |key: ListKey| -> Vec<GameView> {
        lists.list(key).iter().map(GameView::from).collect()
    };

    let waiting = tracker
        .waiting_view(tracker.today())
        .into_iter()
        .map(|(classification, game)| GameView::with_countdown(game, classification))
        .collect();

    let to_play = lists
        .to_play
        .iter()
        .enumerate()
        .map(|(index, game)| GameView::with_order(game, index))
        .collect();

    ListsResponse {
        to_play,
        completed: views(ListKey::Completed),
        finished: views(ListKey::Finished),
        waiting,
        stats: tracker.stats().into(),
    }
}

/// Add a game to the requested list.
pub async fn add_game(
    state: &SharedState,
    payload: AddGameRequest,
) -> Result<GameView, ServiceError> {
    let banner = payload.banner.map(BannerImage::from);
    let record = state
        .tracker()
        .await
        .add_game(&payload.name, payload.list, banner)?;
    Ok(GameView::from(&record))
}

/// Remove one game when `confirmed`.
pub async fn remove_game(
    state: &SharedState,
    list: ListKey,
    id: String,
    confirmed: bool,
) -> ActionResponse {
    let confirmation = Confirmation::from(confirmed);
    let removed = state
        .tracker()
        .await
        .remove_game(&GameId::from(id), list, confirmation);
    if confirmation == Confirmation::Cancelled {
        return outcome(false, "game removed", "removal not confirmed");
    }
    outcome(removed, "game removed", "game not found")
}

/// Set the completion percentage.
pub async fn update_completion(
    state: &SharedState,
    list: ListKey,
    id: String,
    payload: CompletionRequest,
) -> ActionResponse {
    let updated = state
        .tracker()
        .await
        .update_completion(&GameId::from(id), list, payload.completion);
    outcome(updated, "completion updated", "game not found")
}

/// Set or clear the release date.
pub async fn update_release_date(
    state: &SharedState,
    list: ListKey,
    id: String,
    payload: ReleaseDateRequest,
) -> Result<ActionResponse, ServiceError> {
    let updated = state.tracker().await.update_release_date(
        &GameId::from(id),
        list,
        &payload.release_date,
    )?;
    Ok(outcome(updated, "release date updated", "game not found"))
}

/// Replace or remove the banner.
pub async fn update_banner(
    state: &SharedState,
    list: ListKey,
    id: String,
    payload: BannerRequest,
) -> Result<ActionResponse, ServiceError> {
    let banner = payload.banner.map(BannerImage::from);
    let updated = state
        .tracker()
        .await
        .update_banner(&GameId::from(id), list, banner)?;
    Ok(outcome(updated, "banner updated", "game not found"))
}

/// Move a game to an explicit position; a game missing from `from` is left alone.
pub async fn move_game(state: &SharedState, payload: MoveRequest) -> MoveResponse {
    let id = GameId::from(payload.game_id);
    let index = state
        .tracker()
        .await
        .move_game(&id, payload.from, payload.to, payload.target_index);
    if index.is_none() {
        debug!(game = %id, list = %payload.from, "move skipped; game not in source list");
    }
    MoveResponse::new(id.to_string(), payload.to, index)
}

/// Feed one gesture event to the drag controller.
pub async fn handle_drag(state: &SharedState, payload: DragEventRequest) -> DragResponse {
    let mut tracker = state.tracker().await;
    let outcome = tracker.handle_drag(payload.into());
    debug!(phase = ?tracker.drag_phase(), "drag event handled");
    DragResponse::new(outcome, tracker.drag_phase())
}

/// Wipe every list when `confirmed`.
pub async fn clear_all(state: &SharedState, confirmed: bool) -> ActionResponse {
    let cleared = state.tracker().await.clear_all(confirmed.into());
    outcome(cleared, "all lists cleared", "clear not confirmed")
}

/// Per-list counts.
pub async fn stats(state: &SharedState) -> StatsResponse {
    state.tracker().await.stats().into()
}

/// Build the backup file.
pub async fn export_backup(state: &SharedState) -> Result<ExportFile, ServiceError> {
    state.tracker().await.export()
}

/// Replace the whole state with a backup document.
pub async fn import_backup(
    state: &SharedState,
    bytes: &[u8],
) -> Result<ImportResponse, ServiceError> {
    let stats = state.tracker().await.import(bytes)?;
    Ok(ImportResponse {
        message: format!("imported {} games", stats.total),
        stats: stats.into(),
    })
}

/// Storage usage indicator.
pub async fn storage_usage(state: &SharedState) -> Result<StorageUsageResponse, ServiceError> {
    Ok(state.tracker().await.storage_usage()?.into())
}
