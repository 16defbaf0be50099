//! Versioned JSON persistence of the four-list state, plus backup export and import.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{error, info, warn};

use crate::{
    dao::storage::{KeyValueStore, StorageError, StorageResult},
    state::game::GameLists,
};

/// Key holding the four-list document.
pub const STORAGE_KEY: &str = "gameTracker";
/// Key holding the opaque reviews value owned by another component.
pub const REVIEWS_KEY: &str = "gameReviews";
/// Version written into exported backups.
pub const EXPORT_VERSION: &str = "1.1";
/// Suggested file name for exported backups.
pub const EXPORT_FILE_NAME: &str = "game-tracker-backup.json";

/// Lists every stored document must carry; `waiting` was added later.
const REQUIRED_LISTS: [&str; 3] = ["toPlay", "completed", "finished"];

/// Reasons an import document is rejected.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The bytes are not JSON.
    #[error("backup is not valid JSON")]
    Parse(#[source] serde_json::Error),
    /// Neither the versioned wrapper nor a bare document with the required lists.
    #[error("backup does not contain the toPlay, completed and finished lists")]
    MissingLists,
    /// The lists are present but do not hold valid records.
    #[error("backup lists are malformed")]
    InvalidGames(#[source] serde_json::Error),
}

/// Backup file ready to be handed to the environment's download facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name.
    pub file_name: &'static str,
    /// Pretty-printed JSON document.
    pub bytes: Vec<u8>,
}

/// Decoded import document.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedSnapshot {
    /// Migrated four-list state.
    pub lists: GameLists,
    /// Reviews array carried by a versioned backup, if any.
    pub reviews: Option<Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    games: &'a GameLists,
    reviews: &'a Value,
    export_date: String,
    version: &'static str,
}

/// Reads and writes tracker state through a [`KeyValueStore`].
#[derive(Debug)]
pub struct PersistenceGateway<S> {
    store: S,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    /// Wrap a key-value backend.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist the full state. Failures (a full store, a broken disk) are logged and
    /// swallowed: the in-memory state stays authoritative for the session.
    pub fn save(&mut self, lists: &GameLists) {
        if let Err(err) = self.try_save(lists) {
            error!(error = %err, "failed to save tracker data");
        }
    }

    fn try_save(&mut self, lists: &GameLists) -> StorageResult<()> {
        let encoded = serde_json::to_string(lists).map_err(|source| StorageError::Encode {
            key: STORAGE_KEY.to_owned(),
            source,
        })?;
        self.store.set(STORAGE_KEY, &encoded)
    }

    /// Load the persisted state, migrating older documents forward.
    ///
    /// Never fails: an absent, unreadable or malformed document yields empty lists.
    pub fn load(&self) -> GameLists {
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("no saved tracker data; starting empty");
                return GameLists::default();
            }
            Err(err) => {
                error!(error = %err, "failed to read tracker data; starting empty");
                return GameLists::default();
            }
        };

        let decoded = serde_json::from_str::<Value>(&raw)
            .map_err(ImportError::Parse)
            .and_then(|value| decode_lists(&value));
        match decoded {
            Ok(lists) => {
                info!(total = lists.total(), "loaded tracker data");
                lists
            }
            Err(err) => {
                warn!(error = %err, "invalid saved tracker data; using defaults");
                GameLists::default()
            }
        }
    }

    /// Reviews stored under the side-channel key, decoded as-is.
    ///
    /// An empty array stands in when the key is absent or does not hold JSON.
    pub fn load_reviews(&self) -> Value {
        match self.store.get(REVIEWS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "ignoring malformed reviews data");
                Value::Array(Vec::new())
            }),
            Ok(None) => Value::Array(Vec::new()),
            Err(err) => {
                warn!(error = %err, "failed to read reviews data");
                Value::Array(Vec::new())
            }
        }
    }

    /// Replace the side-channel reviews value.
    pub fn save_reviews(&mut self, reviews: &Value) -> StorageResult<()> {
        let encoded = serde_json::to_string(reviews).map_err(|source| StorageError::Encode {
            key: REVIEWS_KEY.to_owned(),
            source,
        })?;
        self.store.set(REVIEWS_KEY, &encoded)
    }

    /// Build the versioned, pretty-printed backup document.
    pub fn export_snapshot(
        &self,
        lists: &GameLists,
        reviews: &Value,
    ) -> StorageResult<ExportFile> {
        let document = ExportDocument {
            games: lists,
            reviews,
            export_date: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_else(|_| "invalid-timestamp".into()),
            version: EXPORT_VERSION,
        };
        let bytes =
            serde_json::to_vec_pretty(&document).map_err(|source| StorageError::Encode {
                key: EXPORT_FILE_NAME.to_owned(),
                source,
            })?;
        Ok(ExportFile {
            file_name: EXPORT_FILE_NAME,
            bytes,
        })
    }

    /// Decode a backup: either the versioned wrapper or a bare legacy document.
    ///
    /// Nothing is written here; the caller commits the result.
    pub fn import_snapshot(&self, bytes: &[u8]) -> Result<ImportedSnapshot, ImportError> {
        let value: Value = serde_json::from_slice(bytes).map_err(ImportError::Parse)?;

        let is_versioned = value.get("games").is_some_and(is_truthy)
            && value.get("version").is_some_and(is_truthy);
        if is_versioned {
            let lists = decode_lists(&value["games"])?;
            let reviews = value.get("reviews").filter(|reviews| reviews.is_array()).cloned();
            return Ok(ImportedSnapshot { lists, reviews });
        }

        Ok(ImportedSnapshot {
            lists: decode_lists(&value)?,
            reviews: None,
        })
    }
}

fn decode_lists(value: &Value) -> Result<GameLists, ImportError> {
    let has_required = REQUIRED_LISTS
        .iter()
        .all(|key| value.get(key).is_some_and(is_truthy));
    if !has_required {
        return Err(ImportError::MissingLists);
    }

    let mut lists = GameLists::deserialize(value).map_err(ImportError::InvalidGames)?;
    lists.migrate();
    Ok(lists)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        dao::memory::MemoryStore,
        state::{
            game::{BannerImage, ListKey},
            list_store::ListStore,
        },
    };

    fn sample_lists() -> GameLists {
        let mut store = ListStore::new();
        store.add("Celeste", ListKey::ToPlay, None).unwrap();
        let banner = BannerImage::positioned("data:image/webp;base64,AAAA", 30.0, 70.0);
        store.add("Tunic", ListKey::Completed, Some(banner)).unwrap();
        let id = store.add("Silksong", ListKey::Waiting, None).unwrap().id.clone();
        store.update_release_date(&id, ListKey::Waiting, "2025-09-04".into());
        store.add("Hades", ListKey::Finished, None).unwrap();
        store.lists().clone()
    }

    #[test]
    fn load_without_data_is_empty() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        assert_eq!(gateway.load(), GameLists::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let lists = sample_lists();
        let mut gateway = PersistenceGateway::new(MemoryStore::new());
        gateway.save(&lists);
        assert_eq!(gateway.load(), lists);
    }

    #[test]
    fn load_migrates_legacy_document() {
        let mut store = MemoryStore::new();
        let legacy = json!({
            "toPlay": [{"id": 1700000000000u64, "name": "Celeste", "dateAdded": "2023-11-14T22:13:20.000Z"}],
            "completed": [],
            "finished": [],
        });
        store.set(STORAGE_KEY, &legacy.to_string()).unwrap();

        let lists = PersistenceGateway::new(store).load();
        assert!(lists.waiting.is_empty());
        assert_eq!(lists.to_play[0].id.as_str(), "1700000000000");
        assert_eq!(lists.to_play[0].completion, 0);
    }

    #[test]
    fn load_fills_waiting_release_dates() {
        let mut store = MemoryStore::new();
        let document = json!({
            "toPlay": [], "completed": [], "finished": [],
            "waiting": [{"id": "w1", "name": "Silksong", "dateAdded": "2023-11-14T22:13:20Z", "completion": 5}],
        });
        store.set(STORAGE_KEY, &document.to_string()).unwrap();

        let lists = PersistenceGateway::new(store).load();
        assert_eq!(lists.waiting[0].release_date.as_deref(), Some(""));
        assert_eq!(lists.waiting[0].completion, 5);
    }

    #[test]
    fn load_degrades_to_empty_on_bad_documents() {
        let documents = [
            "not json",
            r#"{"toPlay": []}"#,
            r#"{"toPlay": 1, "completed": [], "finished": []}"#,
        ];
        for raw in documents {
            let mut store = MemoryStore::new();
            store.set(STORAGE_KEY, raw).unwrap();
            assert_eq!(PersistenceGateway::new(store).load(), GameLists::default(), "{raw}");
        }
    }

    #[test]
    fn save_failure_is_swallowed() {
        let mut gateway = PersistenceGateway::new(MemoryStore::with_capacity(16));
        gateway.save(&sample_lists());
        assert_eq!(gateway.store().get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn export_then_import_round_trips_lists_and_reviews() {
        let lists = sample_lists();
        let reviews = json!([{"game": "Tunic", "stars": 5}]);
        let gateway = PersistenceGateway::new(MemoryStore::new());

        let file = gateway.export_snapshot(&lists, &reviews).unwrap();
        assert_eq!(file.file_name, "game-tracker-backup.json");

        let document: Value = serde_json::from_slice(&file.bytes).unwrap();
        assert_eq!(document["version"], "1.1");
        assert!(document["exportDate"].as_str().unwrap().contains('T'));
        assert!(std::str::from_utf8(&file.bytes).unwrap().contains("\n  "));

        let imported = gateway.import_snapshot(&file.bytes).unwrap();
        assert_eq!(imported.lists, lists);
        assert_eq!(imported.reviews, Some(reviews));
    }

    #[test]
    fn stored_reviews_are_exported_untouched() {
        let mut gateway = PersistenceGateway::new(MemoryStore::new());
        assert_eq!(gateway.load_reviews(), json!([]));

        let reviews = json!({"Tunic": {"stars": 5}});
        gateway.save_reviews(&reviews).unwrap();
        assert_eq!(gateway.load_reviews(), reviews);

        let file = gateway.export_snapshot(&sample_lists(), &gateway.load_reviews()).unwrap();
        let document: Value = serde_json::from_slice(&file.bytes).unwrap();
        assert_eq!(document["reviews"], reviews);
    }

    #[test]
    fn import_keeps_only_review_arrays() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let document = json!({
            "games": sample_lists(),
            "version": "1.1",
            "reviews": "not a list",
        });
        let imported = gateway
            .import_snapshot(&serde_json::to_vec(&document).unwrap())
            .unwrap();
        assert_eq!(imported.reviews, None);
    }

    #[test]
    fn import_accepts_bare_legacy_document() {
        let lists = sample_lists();
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let bare = serde_json::to_vec(&lists).unwrap();
        let imported = gateway.import_snapshot(&bare).unwrap();
        assert_eq!(imported.lists, lists);
        assert_eq!(imported.reviews, None);
    }

    #[test]
    fn import_rejects_documents_without_required_lists() {
        let gateway = PersistenceGateway::new(MemoryStore::new());

        let err = gateway.import_snapshot(br#"{"waiting": []}"#).unwrap_err();
        assert!(matches!(err, ImportError::MissingLists));

        let err = gateway
            .import_snapshot(br#"{"games": {"toPlay": []}, "version": "1.1"}"#)
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingLists));

        let err = gateway.import_snapshot(b"{oops").unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn import_does_not_write_anything() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let file = gateway.export_snapshot(&sample_lists(), &json!([1])).unwrap();
        gateway.import_snapshot(&file.bytes).unwrap();
        assert!(gateway.store().entries().unwrap().is_empty());
    }
}
