//! End-to-end tracker flows over the file and memory stores.

use backlog_tracker::{
    dao::{
        file_store::FileStore, memory::MemoryStore, persistence::STORAGE_KEY,
        storage::KeyValueStore,
    },
    services::tracker_service::{Confirmation, GameTracker, TrackerSettings},
    state::{
        AppState,
        drag::{DragEvent, DragSession, RowHit},
        game::{GameId, ListKey},
    },
};

fn row(game_id: &GameId, index: usize) -> RowHit {
    RowHit {
        game_id: game_id.clone(),
        top: index as f64 * 50.0,
        height: 50.0,
    }
}

#[test]
fn backlog_lifecycle_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let mut tracker = GameTracker::open(store, TrackerSettings::default());

    let celeste = tracker.add_game("Celeste", ListKey::ToPlay, None).unwrap().id;
    let tunic = tracker.add_game("Tunic", ListKey::ToPlay, None).unwrap().id;
    let silksong = tracker.add_game("Silksong", ListKey::Waiting, None).unwrap().id;
    tracker
        .update_release_date(&silksong, ListKey::Waiting, "2025-09-04")
        .unwrap();
    tracker.update_completion(&celeste, ListKey::ToPlay, 100);
    tracker.move_game(&celeste, ListKey::ToPlay, ListKey::Completed, 0);

    let reopened = GameTracker::open(
        FileStore::open(dir.path()).unwrap(),
        TrackerSettings::default(),
    );
    let lists = reopened.snapshot();
    assert_eq!(lists.to_play[0].id, tunic);
    assert_eq!(lists.completed[0].completion, 100);
    assert_eq!(lists.waiting[0].release_date.as_deref(), Some("2025-09-04"));
}

#[test]
fn drag_reorders_and_moves_across_lists() {
    let mut tracker = GameTracker::open(MemoryStore::new(), TrackerSettings::default());
    let ids: Vec<GameId> = ["A", "B", "C"]
        .into_iter()
        .map(|name| tracker.add_game(name, ListKey::ToPlay, None).unwrap().id)
        .collect();

    // Pick up C and drop it on the upper half of A.
    tracker.handle_drag(DragEvent::Start(DragSession {
        game_id: ids[2].clone(),
        source: ListKey::ToPlay,
    }));
    let outcome = tracker.handle_drag(DragEvent::Drop {
        list: ListKey::ToPlay,
        row: Some(row(&ids[0], 0)),
        pointer_y: 10.0,
        payload: None,
    });
    assert_eq!(outcome.applied.map(|(_, index)| index), Some(0));

    // A drop without a tracked gesture falls back to the payload it carries.
    let outcome = tracker.handle_drag(DragEvent::Drop {
        list: ListKey::Finished,
        row: None,
        pointer_y: 0.0,
        payload: Some(DragSession {
            game_id: ids[1].clone(),
            source: ListKey::ToPlay,
        }),
    });
    assert_eq!(outcome.applied.map(|(_, index)| index), Some(0));

    let lists = tracker.snapshot();
    let order: Vec<&str> = lists.to_play.iter().map(|game| game.name.as_str()).collect();
    assert_eq!(order, ["C", "A"]);
    assert_eq!(lists.finished[0].name, "B");
}

#[test]
fn failed_saves_keep_the_session_running() {
    let mut tracker =
        GameTracker::open(MemoryStore::with_capacity(8), TrackerSettings::default());
    let id = tracker.add_game("Outer Wilds", ListKey::ToPlay, None).unwrap().id;
    assert!(tracker.remove_game(&id, ListKey::ToPlay, Confirmation::Confirmed));
    assert_eq!(tracker.stats().total, 0);
}

#[test]
fn legacy_documents_are_migrated_on_open() {
    let mut store = MemoryStore::new();
    store
        .set(
            STORAGE_KEY,
            r#"{"toPlay":[{"id":1699999999999.42,"name":"Hades","dateAdded":"2023-11-14T22:13:20Z"}],"completed":[],"finished":[]}"#,
        )
        .unwrap();

    let tracker = GameTracker::open(store, TrackerSettings::default());
    assert_eq!(tracker.snapshot().to_play[0].id.as_str(), "1699999999999.42");
    assert!(tracker.snapshot().waiting.is_empty());
}

#[tokio::test]
async fn shared_state_serializes_operations() {
    let state = AppState::new(Box::new(MemoryStore::new()), TrackerSettings::default());

    let tasks: Vec<_> = (0..8)
        .map(|idx| {
            let state = state.clone();
            tokio::spawn(async move {
                state
                    .tracker()
                    .await
                    .add_game(&format!("Game {idx}"), ListKey::Finished, None)
                    .map(|record| record.id)
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let mut tracker = state.tracker().await;
    assert!(!tracker.clear_all(Confirmation::Cancelled));
    assert_eq!(tracker.stats().total, 8);
}
