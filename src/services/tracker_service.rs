//! Tracker facade combining the list store, persistence and the drag controller.
//!
//! Every mutation that changes the lists is followed by a synchronous save; read paths never
//! touch the backend.

use serde_json::Value;
use time::{Date, UtcOffset};
use tracing::{debug, info, warn};

use crate::{
    config::{AppConfig, DEFAULT_MAX_BANNER_BYTES, DEFAULT_STORAGE_CAPACITY_BYTES},
    dao::{
        persistence::{ExportFile, PersistenceGateway},
        storage::KeyValueStore,
    },
    error::ServiceError,
    services::storage_usage::{self, StorageUsage},
    state::{
        drag::{DragController, DragEvent, DragPhase, DropIndicator, MoveCommand},
        game::{BannerImage, GameId, GameLists, GameRecord, ListKey},
        list_store::{ListStore, Stats},
        release_date::{self, Classification},
    },
};

/// Tunables the tracker needs from the application configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    /// Budget the storage usage is measured against.
    pub storage_capacity_bytes: u64,
    /// Largest estimated banner payload accepted.
    pub max_banner_bytes: u64,
    /// Offset used to decide which calendar day "today" is.
    pub local_offset: UtcOffset,
}

/// Room left in a request body for everything around a banner.
const REQUEST_OVERHEAD_BYTES: u64 = 64 * 1024;

impl TrackerSettings {
    /// Largest request body the game endpoints accept: a full banner as a `data:` URL plus JSON.
    pub fn game_body_limit(&self) -> usize {
        body_limit(self.max_banner_bytes.saturating_mul(4) / 3)
    }

    /// Largest backup document accepted for import.
    pub fn backup_body_limit(&self) -> usize {
        body_limit(self.storage_capacity_bytes)
    }
}

fn body_limit(payload: u64) -> usize {
    usize::try_from(payload.saturating_add(REQUEST_OVERHEAD_BYTES)).unwrap_or(usize::MAX)
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            storage_capacity_bytes: DEFAULT_STORAGE_CAPACITY_BYTES,
            max_banner_bytes: DEFAULT_MAX_BANNER_BYTES,
            local_offset: UtcOffset::UTC,
        }
    }
}

impl From<&AppConfig> for TrackerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            storage_capacity_bytes: config.storage_capacity_bytes,
            max_banner_bytes: config.max_banner_bytes,
            ..Self::default()
        }
    }
}

/// Answer to a destructive-action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The user accepted.
    Confirmed,
    /// The user declined; nothing changes.
    Cancelled,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Cancelled
        }
    }
}

/// Side effects of one drag event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DragOutcome {
    /// Hover feedback to render.
    pub indicator: Option<DropIndicator>,
    /// Move applied to the lists and the index the record landed at.
    pub applied: Option<(MoveCommand, usize)>,
}

/// Single owner of the tracker state for one session.
#[derive(Debug)]
pub struct GameTracker<S> {
    lists: ListStore,
    persistence: PersistenceGateway<S>,
    drag: DragController,
    settings: TrackerSettings,
}

impl<S: KeyValueStore> GameTracker<S> {
    /// Load the persisted state from `store` and start tracking.
    pub fn open(store: S, settings: TrackerSettings) -> Self {
        let persistence = PersistenceGateway::new(store);
        let lists = persistence.load();
        info!(total = lists.total(), "tracker ready");
        Self {
            lists: ListStore::from_lists(lists),
            persistence,
            drag: DragController::new(),
            settings,
        }
    }

    /// Current four-list state.
    pub fn snapshot(&self) -> &GameLists {
        self.lists.lists()
    }

    /// Record counts per list.
    pub fn stats(&self) -> Stats {
        self.lists.stats()
    }

    /// Today's calendar date at the configured offset.
    pub fn today(&self) -> Date {
        release_date::today_in(self.settings.local_offset)
    }

    /// Waiting list in release order, with each record's classification.
    pub fn waiting_view(&self, today: Date) -> Vec<(Classification, &GameRecord)> {
        release_date::sorted_view(self.lists.lists().list(ListKey::Waiting), today)
    }

    /// Current drag phase.
    pub fn drag_phase(&self) -> &DragPhase {
        self.drag.phase()
    }

    fn persist(&mut self) {
        self.persistence.save(self.lists.lists());
    }

    fn check_banner(&self, banner_image: Option<&BannerImage>) -> Result<(), ServiceError> {
        let Some(banner_image) = banner_image else {
            return Ok(());
        };
        let estimated = banner_image.estimated_bytes();
        if estimated > self.settings.max_banner_bytes {
            return Err(ServiceError::BannerTooLarge {
                estimated,
                limit: self.settings.max_banner_bytes,
            });
        }
        Ok(())
    }

    /// Add a record and persist it, returning a copy of the stored record.
    pub fn add_game(
        &mut self,
        name: &str,
        list: ListKey,
        banner_image: Option<BannerImage>,
    ) -> Result<GameRecord, ServiceError> {
        self.check_banner(banner_image.as_ref())?;
        let record = self.lists.add(name, list, banner_image)?.clone();
        self.persist();
        info!(id = %record.id, name = %record.name, %list, "game added");
        Ok(record)
    }

    /// Delete a record once the user confirmed. Returns whether anything was removed.
    pub fn remove_game(&mut self, id: &GameId, list: ListKey, confirmation: Confirmation) -> bool {
        if confirmation == Confirmation::Cancelled {
            debug!(%id, %list, "removal cancelled");
            return false;
        }
        let removed = self.lists.remove(id, list);
        if removed {
            self.persist();
            info!(%id, %list, "game removed");
        }
        removed
    }

    /// Store a completion percentage (clamped into 0-100).
    pub fn update_completion(&mut self, id: &GameId, list: ListKey, value: i64) -> bool {
        let updated = self.lists.update_completion(id, list, value);
        if updated {
            self.persist();
        }
        updated
    }

    /// Validate and store a release date. An empty input clears it to "no date".
    ///
    /// Invalid input leaves the previous value untouched.
    pub fn update_release_date(
        &mut self,
        id: &GameId,
        list: ListKey,
        raw: &str,
    ) -> Result<bool, ServiceError> {
        let raw = raw.trim();
        let value = if raw.is_empty() {
            String::new()
        } else {
            release_date::validate_release_date(raw)?;
            release_date::normalize_release_date(raw)
        };

        let updated = self.lists.update_release_date(id, list, value);
        if updated {
            self.persist();
        }
        Ok(updated)
    }

    /// Replace or clear a banner, rejecting payloads over the configured limit.
    pub fn update_banner(
        &mut self,
        id: &GameId,
        list: ListKey,
        banner_image: Option<BannerImage>,
    ) -> Result<bool, ServiceError> {
        self.check_banner(banner_image.as_ref())?;
        let updated = self.lists.update_banner(id, list, banner_image);
        if updated {
            self.persist();
        }
        Ok(updated)
    }

    /// Move a record, returning the index it landed at.
    pub fn move_game(
        &mut self,
        id: &GameId,
        from: ListKey,
        to: ListKey,
        target_index: usize,
    ) -> Option<usize> {
        let landed = self.lists.move_game(id, from, to, target_index);
        if landed.is_some() {
            self.persist();
        }
        landed
    }

    /// Feed a gesture event to the drag controller and apply the resulting move, if any.
    pub fn handle_drag(&mut self, event: DragEvent) -> DragOutcome {
        let (command, indicator) = self.drag.handle(event, self.lists.lists());
        let applied = command.and_then(|command| {
            let landed = self.move_game(
                &command.game_id,
                command.from,
                command.to,
                command.target_index,
            )?;
            Some((command, landed))
        });
        DragOutcome { indicator, applied }
    }

    /// Wipe every list once the user confirmed.
    pub fn clear_all(&mut self, confirmation: Confirmation) -> bool {
        if confirmation == Confirmation::Cancelled {
            debug!("clear all cancelled");
            return false;
        }
        self.lists.clear_all();
        self.persist();
        info!("all lists cleared");
        true
    }

    /// Build the backup file with the current lists and the stored reviews.
    pub fn export(&self) -> Result<ExportFile, ServiceError> {
        let reviews = self.persistence.load_reviews();
        let file = self
            .persistence
            .export_snapshot(self.lists.lists(), &reviews)?;
        info!(bytes = file.bytes.len(), "backup exported");
        Ok(file)
    }

    /// Replace the whole state with a backup. A rejected document changes nothing.
    pub fn import(&mut self, bytes: &[u8]) -> Result<Stats, ServiceError> {
        let imported = self.persistence.import_snapshot(bytes)?;
        self.lists.replace(imported.lists);
        self.persist();

        if let Some(reviews) = imported.reviews {
            self.store_reviews(&reviews);
        }

        let stats = self.lists.stats();
        info!(total = stats.total, "backup imported");
        Ok(stats)
    }

    fn store_reviews(&mut self, reviews: &Value) {
        if let Err(err) = self.persistence.save_reviews(reviews) {
            warn!(error = %err, "failed to store imported reviews");
        }
    }

    /// Estimated backend usage against the configured budget.
    pub fn storage_usage(&self) -> Result<StorageUsage, ServiceError> {
        Ok(storage_usage::measure(
            self.persistence.store(),
            self.settings.storage_capacity_bytes,
        )?)
    }
}
