//! DTO definitions for the list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    dto::{format_timestamp, validation::validate_game_name},
    state::{
        game::{BannerImage, DEFAULT_BANNER_POSITION, GameRecord, ListKey},
        list_store::Stats,
        release_date::{Classification, Tone},
    },
};

/// Banner payload supplied when adding or editing a game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BannerInput {
    /// Image location, usually a `data:` URL.
    #[validate(length(min = 1))]
    pub image_url: String,
    #[serde(default = "centered")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub position_x: f64,
    #[serde(default = "centered")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub position_y: f64,
}

fn centered() -> f64 {
    DEFAULT_BANNER_POSITION
}

impl From<BannerInput> for BannerImage {
    fn from(input: BannerInput) -> Self {
        BannerImage::positioned(input.image_url, input.position_x, input.position_y)
    }
}

/// Request to add a game to one of the lists.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddGameRequest {
    #[validate(custom(function = "validate_game_name"))]
    pub name: String,
    pub list: ListKey,
    #[serde(default)]
    #[validate(nested)]
    pub banner: Option<BannerInput>,
}

/// Request to set the completion percentage; values outside 0-100 are clamped.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CompletionRequest {
    pub completion: i64,
}

/// Request to set the release date (`YYYY-MM-DD`, `YYYY`, `unknown` or empty).
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReleaseDateRequest {
    pub release_date: String,
}

/// Request to replace the banner; `null` removes it.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BannerRequest {
    #[serde(default)]
    #[validate(nested)]
    pub banner: Option<BannerInput>,
}

/// Request to move a game to a position in any list.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveRequest {
    pub game_id: String,
    pub from: ListKey,
    pub to: ListKey,
    /// Destination index as seen before the game is taken out of its source list.
    pub target_index: usize,
}

/// Where a moved game ended up; `changed` is false when it was not in the source list.
#[derive(Debug, Serialize, ToSchema)]
pub struct MoveResponse {
    pub game_id: String,
    pub list: ListKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub changed: bool,
}

impl MoveResponse {
    /// Response for a move that landed at `index`, or did nothing when `None`.
    pub fn new(game_id: String, list: ListKey, index: Option<usize>) -> Self {
        Self {
            game_id,
            list,
            changed: index.is_some(),
            index,
        }
    }
}

/// Confirmation flag required by destructive endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConfirmQuery {
    /// Must be `true` for the action to run.
    #[serde(default)]
    pub confirm: bool,
}

/// Generic acknowledgement; `changed` is false when nothing matched.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub message: String,
    pub changed: bool,
}

/// Banner as rendered by clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct BannerView {
    pub image_url: String,
    pub position_x: f64,
    pub position_y: f64,
}

impl From<&BannerImage> for BannerView {
    fn from(banner: &BannerImage) -> Self {
        let (position_x, position_y) = banner.position();
        Self {
            image_url: banner.image_url().to_owned(),
            position_x,
            position_y,
        }
    }
}

/// Visual tone of a countdown label.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CountdownTone {
    Overdue,
    Soon,
    FutureYear,
    Unknown,
    Normal,
}

impl From<Tone> for CountdownTone {
    fn from(tone: Tone) -> Self {
        match tone {
            Tone::Overdue => CountdownTone::Overdue,
            Tone::Soon => CountdownTone::Soon,
            Tone::FutureYear => CountdownTone::FutureYear,
            Tone::Unknown => CountdownTone::Unknown,
            Tone::Normal => CountdownTone::Normal,
        }
    }
}

/// Countdown label shown next to waiting games.
#[derive(Debug, Serialize, ToSchema)]
pub struct CountdownView {
    pub label: String,
    pub tone: CountdownTone,
}

impl CountdownView {
    /// Countdown for a classification; unset dates have none.
    pub fn from_classification(classification: Classification) -> Option<Self> {
        Some(Self {
            label: classification.label()?,
            tone: classification.tone()?.into(),
        })
    }
}

/// A tracked game as exposed by the API.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameView {
    pub id: String,
    pub name: String,
    /// RFC 3339 creation timestamp.
    pub date_added: String,
    pub completion: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<BannerView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<CountdownView>,
    /// 1-based priority shown for games in `toPlay`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
}

impl From<&GameRecord> for GameView {
    fn from(game: &GameRecord) -> Self {
        Self {
            id: game.id.to_string(),
            name: game.name.clone(),
            date_added: format_timestamp(game.date_added),
            completion: game.completion,
            release_date: game.release_date.clone(),
            banner: game.banner_image.as_ref().map(BannerView::from),
            countdown: None,
            order: None,
        }
    }
}

impl GameView {
    /// View of a waiting game with its countdown attached.
    pub fn with_countdown(game: &GameRecord, classification: Classification) -> Self {
        Self {
            countdown: CountdownView::from_classification(classification),
            ..Self::from(game)
        }
    }

    /// View of a prioritized game with its 1-based order number.
    pub fn with_order(game: &GameRecord, index: usize) -> Self {
        Self {
            order: Some(index + 1),
            ..Self::from(game)
        }
    }
}

/// Record counts per list.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub to_play: usize,
    pub completed: usize,
    pub finished: usize,
    pub waiting: usize,
    pub total: usize,
}

impl From<Stats> for StatsResponse {
    fn from(stats: Stats) -> Self {
        let count = |key: ListKey| stats.per_list.get(&key).copied().unwrap_or_default();
        Self {
            to_play: count(ListKey::ToPlay),
            completed: count(ListKey::Completed),
            finished: count(ListKey::Finished),
            waiting: count(ListKey::Waiting),
            total: stats.total,
        }
    }
}

/// Every list ready for rendering; `waiting` is in release order.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListsResponse {
    pub to_play: Vec<GameView>,
    pub completed: Vec<GameView>,
    pub finished: Vec<GameView>,
    pub waiting: Vec<GameView>,
    pub stats: StatsResponse,
}
