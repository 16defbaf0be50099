/// Drag-and-drop gesture state machine.
pub mod drag;
/// Game records, list keys and legacy document migration.
pub mod game;
/// Ordered four-list store and its mutations.
pub mod list_store;
/// Release date classification, countdown labels and input validation.
pub mod release_date;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    dao::storage::KeyValueStore,
    services::tracker_service::{GameTracker, TrackerSettings},
};

/// Reference-counted handle passed to every route handler.
pub type SharedState = Arc<AppState>;

/// Tracker bound to whichever backend the binary selected.
pub type DynTracker = GameTracker<Box<dyn KeyValueStore>>;

/// Central application state owning the single tracker instance.
pub struct AppState {
    tracker: Mutex<DynTracker>,
    settings: TrackerSettings,
}

impl AppState {
    /// Load the tracker from `store` and wrap it in an [`Arc`] so it can be cloned cheaply.
    pub fn new(store: Box<dyn KeyValueStore>, settings: TrackerSettings) -> SharedState {
        Arc::new(Self {
            tracker: Mutex::new(GameTracker::open(store, settings)),
            settings,
        })
    }

    /// Exclusive access to the tracker; operations run one at a time to completion.
    pub async fn tracker(&self) -> MutexGuard<'_, DynTracker> {
        self.tracker.lock().await
    }

    /// Limits the tracker was opened with.
    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }
}
