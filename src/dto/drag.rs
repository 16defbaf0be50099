use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::games::MoveResponse,
    services::tracker_service::DragOutcome,
    state::{
        drag::{DragEvent, DragPhase, DragSession, DropIndicator, Placement, RowHit},
        game::ListKey,
    },
};

/// Dragged game and the list it was picked up from.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DragPayload {
    pub game_id: String,
    pub source: ListKey,
}

impl From<DragPayload> for DragSession {
    fn from(payload: DragPayload) -> Self {
        Self {
            game_id: payload.game_id.into(),
            source: payload.source,
        }
    }
}

/// Geometry of the row under the pointer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RowHitInput {
    pub game_id: String,
    pub top: f64,
    pub height: f64,
}

impl From<RowHitInput> for RowHit {
    fn from(input: RowHitInput) -> Self {
        Self {
            game_id: input.game_id.into(),
            top: input.top,
            height: input.height,
        }
    }
}

/// Gesture event forwarded by the presentation layer.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DragEventRequest {
    /// A game was picked up.
    Start {
        game_id: String,
        source: ListKey,
    },
    /// The pointer is over a row.
    HoverRow {
        list: ListKey,
        row: RowHitInput,
        pointer_y: f64,
    },
    /// The pointer is over a list without a row under it.
    HoverList { list: ListKey },
    /// The game was released.
    Drop {
        list: ListKey,
        #[serde(default)]
        row: Option<RowHitInput>,
        #[serde(default)]
        pointer_y: f64,
        /// Drag payload carried by the drop, used when no gesture is being tracked.
        #[serde(default)]
        payload: Option<DragPayload>,
    },
    /// The gesture ended or was cancelled.
    End,
}

impl From<DragEventRequest> for DragEvent {
    fn from(request: DragEventRequest) -> Self {
        match request {
            DragEventRequest::Start { game_id, source } => DragEvent::Start(DragSession {
                game_id: game_id.into(),
                source,
            }),
            DragEventRequest::HoverRow {
                list,
                row,
                pointer_y,
            } => DragEvent::HoverRow {
                list,
                row: row.into(),
                pointer_y,
            },
            DragEventRequest::HoverList { list } => DragEvent::HoverList { list },
            DragEventRequest::Drop {
                list,
                row,
                pointer_y,
                payload,
            } => DragEvent::Drop {
                list,
                row: row.map(RowHit::from),
                pointer_y,
                payload: payload.map(DragSession::from),
            },
            DragEventRequest::End => DragEvent::End,
        }
    }
}

/// Side of the hovered row a drop would land on.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlacementView {
    Before,
    After,
}

/// Hover feedback to render.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorView {
    /// Reordering inside the source list; `position` is 1-based.
    Reorder {
        target: String,
        placement: PlacementView,
        position: usize,
    },
    /// Moving into another list.
    CrossList { list: ListKey },
}

impl From<DropIndicator> for IndicatorView {
    fn from(indicator: DropIndicator) -> Self {
        match indicator {
            DropIndicator::Reorder {
                target,
                placement,
                position,
            } => IndicatorView::Reorder {
                target: target.to_string(),
                placement: match placement {
                    Placement::Before => PlacementView::Before,
                    Placement::After => PlacementView::After,
                },
                position,
            },
            DropIndicator::CrossList { list } => IndicatorView::CrossList { list },
        }
    }
}

/// Response to a drag event.
#[derive(Debug, Serialize, ToSchema)]
pub struct DragResponse {
    /// Whether a gesture is still in progress.
    pub dragging: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator: Option<IndicatorView>,
    /// Present when the event completed a drop that moved a game.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved: Option<MoveResponse>,
}

impl DragResponse {
    /// Build the response from the tracker outcome and the phase after the event.
    pub fn new(outcome: DragOutcome, phase: &DragPhase) -> Self {
        Self {
            dragging: matches!(phase, DragPhase::Dragging(_)),
            indicator: outcome.indicator.map(IndicatorView::from),
            moved: outcome.applied.map(|(command, index)| {
                MoveResponse::new(command.game_id.to_string(), command.to, Some(index))
            }),
        }
    }
}
