use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Completion percentage bounds.
pub const COMPLETION_MAX: u8 = 100;
/// Default banner anchor used when a position is missing (centered).
pub const DEFAULT_BANNER_POSITION: f64 = 50.0;

/// The four named lists a record can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ListKey {
    /// Games queued up to be played, kept in manual priority order.
    ToPlay,
    /// Games whose main content has been completed.
    Completed,
    /// Games that were finished (or dropped) for good.
    Finished,
    /// Games waiting for their release.
    Waiting,
}

impl ListKey {
    /// Every list, in display order.
    pub const ALL: [ListKey; 4] = [
        ListKey::ToPlay,
        ListKey::Completed,
        ListKey::Finished,
        ListKey::Waiting,
    ];

    /// Storage key used for the list inside persisted documents.
    pub fn as_str(self) -> &'static str {
        match self {
            ListKey::ToPlay => "toPlay",
            ListKey::Completed => "completed",
            ListKey::Finished => "finished",
            ListKey::Waiting => "waiting",
        }
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a record.
///
/// Fresh identifiers are UUIDv4 tokens. Older documents stored numeric ids, which are
/// accepted on load and kept as their decimal representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Allocate a new collision-free identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GameId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GameId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum GameIdRepr {
            Token(String),
            Legacy(serde_json::Number),
        }

        Ok(match GameIdRepr::deserialize(deserializer)? {
            GameIdRepr::Token(token) => GameId(token),
            GameIdRepr::Legacy(number) => GameId(number.to_string()),
        })
    }
}

/// Banner attached to a record, either a bare image URL written by older versions or
/// an image with a background anchor expressed in percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BannerImage {
    /// Image with an explicit crop anchor.
    #[serde(rename_all = "camelCase")]
    Positioned {
        /// Image location (usually a data URL).
        image_url: String,
        /// Horizontal anchor, 0-100.
        #[serde(
            default = "default_position",
            deserialize_with = "deserialize_position"
        )]
        position_x: f64,
        /// Vertical anchor, 0-100.
        #[serde(
            default = "default_position",
            deserialize_with = "deserialize_position"
        )]
        position_y: f64,
    },
    /// Raw image URL without positioning.
    LegacyUrl(String),
}

impl BannerImage {
    /// Build a positioned banner, clamping the anchor into the 0-100 range.
    pub fn positioned(image_url: impl Into<String>, position_x: f64, position_y: f64) -> Self {
        BannerImage::Positioned {
            image_url: image_url.into(),
            position_x: clamp_position(position_x),
            position_y: clamp_position(position_y),
        }
    }

    /// Image location regardless of the stored shape.
    pub fn image_url(&self) -> &str {
        match self {
            BannerImage::Positioned { image_url, .. } => image_url,
            BannerImage::LegacyUrl(url) => url,
        }
    }

    /// Crop anchor as `(x, y)` percentages; legacy banners are centered.
    pub fn position(&self) -> (f64, f64) {
        match self {
            BannerImage::Positioned {
                position_x,
                position_y,
                ..
            } => (*position_x, *position_y),
            BannerImage::LegacyUrl(_) => (DEFAULT_BANNER_POSITION, DEFAULT_BANNER_POSITION),
        }
    }

    /// Estimated decoded size of a base64 data URL (three bytes per four characters).
    pub fn estimated_bytes(&self) -> u64 {
        self.image_url().len() as u64 * 3 / 4
    }
}

fn default_position() -> f64 {
    DEFAULT_BANNER_POSITION
}

fn clamp_position(value: f64) -> f64 {
    if value.is_nan() {
        DEFAULT_BANNER_POSITION
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn deserialize_position<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(clamp_position).unwrap_or(DEFAULT_BANNER_POSITION))
}

/// A single tracked game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Stable identifier, unique across all lists.
    pub id: GameId,
    /// Display name, unique across all lists (case-insensitive).
    pub name: String,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339", default = "unknown_date_added")]
    pub date_added: OffsetDateTime,
    /// Completion percentage, always within 0-100.
    #[serde(default, deserialize_with = "deserialize_completion")]
    pub completion: u8,
    /// Raw release date (`""`, `YYYY`, `YYYY-MM-DD` or `Unknown`). Once set it is never
    /// removed, even when the record leaves the waiting list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Optional banner.
    #[serde(default)]
    pub banner_image: Option<BannerImage>,
}

impl GameRecord {
    /// Create a brand-new record destined for `list`.
    pub fn new(name: String, list: ListKey, banner_image: Option<BannerImage>) -> Self {
        Self {
            id: GameId::generate(),
            name,
            date_added: OffsetDateTime::now_utc(),
            completion: 0,
            release_date: (list == ListKey::Waiting).then(String::new),
            banner_image,
        }
    }

    /// Ensure the fields required by `list` are present.
    pub fn prepare_for(&mut self, list: ListKey) {
        if list == ListKey::Waiting && self.release_date.is_none() {
            self.release_date = Some(String::new());
        }
    }
}

fn unknown_date_added() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH
}

/// Clamp an arbitrary completion value into 0-100.
pub fn clamp_completion(value: i64) -> u8 {
    value.clamp(0, i64::from(COMPLETION_MAX)) as u8
}

fn deserialize_completion<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite())
        .map(|v| clamp_completion(v.trunc() as i64))
        .unwrap_or(0))
}

/// The complete four-list state, serialized exactly as persisted.
///
/// `toPlay`, `completed` and `finished` are mandatory in stored documents; `waiting`
/// appeared later and defaults to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLists {
    /// Games to play, in priority order.
    pub to_play: Vec<GameRecord>,
    /// Completed games.
    pub completed: Vec<GameRecord>,
    /// Finished games.
    pub finished: Vec<GameRecord>,
    /// Games waiting for release, in manual order (display sorts them).
    #[serde(default)]
    pub waiting: Vec<GameRecord>,
}

impl GameLists {
    /// Borrow one list.
    pub fn list(&self, key: ListKey) -> &[GameRecord] {
        match key {
            ListKey::ToPlay => &self.to_play,
            ListKey::Completed => &self.completed,
            ListKey::Finished => &self.finished,
            ListKey::Waiting => &self.waiting,
        }
    }

    /// Mutably borrow one list.
    pub fn list_mut(&mut self, key: ListKey) -> &mut Vec<GameRecord> {
        match key {
            ListKey::ToPlay => &mut self.to_play,
            ListKey::Completed => &mut self.completed,
            ListKey::Finished => &mut self.finished,
            ListKey::Waiting => &mut self.waiting,
        }
    }

    /// Iterate over every list with its key.
    pub fn iter(&self) -> impl Iterator<Item = (ListKey, &[GameRecord])> {
        ListKey::ALL.into_iter().map(|key| (key, self.list(key)))
    }

    /// Total number of records across all lists.
    pub fn total(&self) -> usize {
        self.iter().map(|(_, games)| games.len()).sum()
    }

    /// Position of a record inside a list.
    pub fn position(&self, key: ListKey, id: &GameId) -> Option<usize> {
        self.list(key).iter().position(|game| &game.id == id)
    }

    /// Apply forward schema migration after loading an older document.
    pub fn migrate(&mut self) {
        for game in &mut self.waiting {
            game.prepare_for(ListKey::Waiting);
        }
    }
}
