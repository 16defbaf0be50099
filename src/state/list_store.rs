use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::state::game::{BannerImage, GameId, GameLists, GameRecord, ListKey, clamp_completion};

/// Errors raised when adding a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// The trimmed name is empty.
    #[error("game name must not be empty")]
    EmptyName,
    /// Another record already uses this name (case-insensitive).
    #[error("`{name}` is already in your tracker")]
    DuplicateName {
        /// Name as submitted.
        name: String,
    },
}

/// Per-list and total record counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Count for every list, in display order.
    #[serde(flatten)]
    pub per_list: IndexMap<ListKey, usize>,
    /// Sum over all lists.
    pub total: usize,
}

/// Owner of the four ordered lists.
///
/// Every operation runs to completion against the single in-memory state; lookups that
/// miss (stale references to deleted records) are silent no-ops.
#[derive(Debug, Clone, Default)]
pub struct ListStore {
    lists: GameLists,
}

impl ListStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate a store from previously persisted lists.
    pub fn from_lists(lists: GameLists) -> Self {
        Self { lists }
    }

    /// Read-only view of the full state.
    pub fn lists(&self) -> &GameLists {
        &self.lists
    }

    /// Replace the whole state at once.
    pub fn replace(&mut self, lists: GameLists) {
        self.lists = lists;
    }

    /// Find a record by id inside one list.
    pub fn find(&self, id: &GameId, list: ListKey) -> Option<&GameRecord> {
        self.lists.list(list).iter().find(|game| &game.id == id)
    }

    fn find_mut(&mut self, id: &GameId, list: ListKey) -> Option<&mut GameRecord> {
        self.lists.list_mut(list).iter_mut().find(|game| &game.id == id)
    }

    fn contains_name(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.lists
            .iter()
            .flat_map(|(_, games)| games.iter())
            .any(|game| game.name.to_lowercase() == needle)
    }

    /// Append a new record to `list`.
    pub fn add(
        &mut self,
        name: &str,
        list: ListKey,
        banner_image: Option<BannerImage>,
    ) -> Result<&GameRecord, ListError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ListError::EmptyName);
        }
        if self.contains_name(name) {
            return Err(ListError::DuplicateName {
                name: name.to_owned(),
            });
        }

        let record = GameRecord::new(name.to_owned(), list, banner_image);
        debug!(id = %record.id, %list, "adding game");
        let games = self.lists.list_mut(list);
        games.push(record);
        Ok(&games[games.len() - 1])
    }

    /// Delete a record. Returns whether anything was removed.
    pub fn remove(&mut self, id: &GameId, list: ListKey) -> bool {
        let games = self.lists.list_mut(list);
        let before = games.len();
        games.retain(|game| &game.id != id);
        before != games.len()
    }

    /// Store a completion percentage, clamped into 0-100.
    pub fn update_completion(&mut self, id: &GameId, list: ListKey, value: i64) -> bool {
        self.find_mut(id, list)
            .map(|game| game.completion = clamp_completion(value))
            .is_some()
    }

    /// Store an already validated and normalized release date.
    pub fn update_release_date(&mut self, id: &GameId, list: ListKey, value: String) -> bool {
        self.find_mut(id, list)
            .map(|game| game.release_date = Some(value))
            .is_some()
    }

    /// Replace or clear the banner.
    pub fn update_banner(
        &mut self,
        id: &GameId,
        list: ListKey,
        banner_image: Option<BannerImage>,
    ) -> bool {
        self.find_mut(id, list)
            .map(|game| game.banner_image = banner_image)
            .is_some()
    }

    /// Move a record to `target_index` in `to`, returning the index it landed at.
    ///
    /// `target_index` is expressed against the destination list as it looks before the
    /// record is taken out, so "insert before row N" keeps meaning that in both
    /// directions within the same list. Returns `None` (and changes nothing) when the
    /// record is not in `from`.
    pub fn move_game(
        &mut self,
        id: &GameId,
        from: ListKey,
        to: ListKey,
        target_index: usize,
    ) -> Option<usize> {
        let current = self.lists.position(from, id)?;
        let mut record = self.lists.list_mut(from).remove(current);

        let mut target_index = target_index;
        if from == to && current < target_index {
            target_index -= 1;
        }

        let destination = self.lists.list_mut(to);
        let target_index = target_index.min(destination.len());
        record.prepare_for(to);
        destination.insert(target_index, record);

        debug!(%id, %from, %to, from_index = current, to_index = target_index, "moved game");
        Some(target_index)
    }

    /// Drop every record from every list.
    pub fn clear_all(&mut self) {
        self.lists = GameLists::default();
    }

    /// Record counts per list and overall.
    pub fn stats(&self) -> Stats {
        let per_list: IndexMap<ListKey, usize> = self
            .lists
            .iter()
            .map(|(key, games)| (key, games.len()))
            .collect();
        let total = per_list.values().sum();
        Stats { per_list, total }
    }
}
