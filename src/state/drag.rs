use crate::state::game::{GameId, GameLists, ListKey};

/// Record being dragged and the list it was picked up from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    /// Identifier of the dragged record.
    pub game_id: GameId,
    /// List the record was picked up from.
    pub source: ListKey,
}

/// Phases of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// Nothing is being dragged.
    #[default]
    Idle,
    /// A record is being dragged.
    Dragging(DragSession),
}

/// Geometry of the row under the pointer, in the same vertical coordinate space as the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct RowHit {
    /// Record rendered in the row.
    pub game_id: GameId,
    /// Top edge of the row.
    pub top: f64,
    /// Row height.
    pub height: f64,
}

impl RowHit {
    /// Whether `pointer_y` lies past the vertical midpoint of the row.
    pub fn is_lower_half(&self, pointer_y: f64) -> bool {
        pointer_y > self.top + self.height / 2.0
    }
}

/// Gesture events fed to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// A record was picked up.
    Start(DragSession),
    /// The pointer moved over a specific row of `list`.
    HoverRow {
        /// List the row belongs to.
        list: ListKey,
        /// Row under the pointer.
        row: RowHit,
        /// Pointer vertical position.
        pointer_y: f64,
    },
    /// The pointer moved over an area of `list` without a row.
    HoverList {
        /// List under the pointer.
        list: ListKey,
    },
    /// The record was released over `list`, optionally over a specific row.
    Drop {
        /// List receiving the drop.
        list: ListKey,
        /// Row under the pointer, if any.
        row: Option<RowHit>,
        /// Pointer vertical position.
        pointer_y: f64,
        /// Drag payload carried by the drop itself, used when no session is tracked.
        payload: Option<DragSession>,
    },
    /// The gesture ended (dropped or cancelled).
    End,
}

/// Store command produced by a completed drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCommand {
    /// Record to move.
    pub game_id: GameId,
    /// List the record currently lives in.
    pub from: ListKey,
    /// Destination list.
    pub to: ListKey,
    /// Index in the destination list before the record is taken out of its source.
    pub target_index: usize,
}

/// Where a hovered drop would land relative to the hovered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Above the hovered row.
    Before,
    /// Below the hovered row.
    After,
}

/// Feedback shown while hovering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIndicator {
    /// Reordering inside the source list.
    Reorder {
        /// Hovered row.
        target: GameId,
        /// Side of the hovered row.
        placement: Placement,
        /// 1-based position the record would occupy after the drop.
        position: usize,
    },
    /// Dropping would move the record into another list.
    CrossList {
        /// Destination list.
        list: ListKey,
    },
}

/// Result of feeding one event to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Phase after the event.
    pub next: DragPhase,
    /// Move to apply to the store, if the event completed a drop.
    pub command: Option<MoveCommand>,
    /// Hover feedback, if any.
    pub indicator: Option<DropIndicator>,
}

impl Transition {
    fn to(next: DragPhase) -> Self {
        Self {
            next,
            command: None,
            indicator: None,
        }
    }
}

/// Compute the next phase and the side effects of `event`.
///
/// `lists` is only read to resolve row positions; the store is never mutated here.
pub fn transition(phase: &DragPhase, event: DragEvent, lists: &GameLists) -> Transition {
    match (phase, event) {
        (_, DragEvent::Start(session)) => Transition::to(DragPhase::Dragging(session)),
        (_, DragEvent::End) => Transition::to(DragPhase::Idle),
        (
            DragPhase::Dragging(session),
            DragEvent::HoverRow {
                list,
                row,
                pointer_y,
            },
        ) => Transition {
            next: phase.clone(),
            command: None,
            indicator: hover_row_indicator(session, list, &row, pointer_y, lists),
        },
        (DragPhase::Dragging(session), DragEvent::HoverList { list }) => Transition {
            next: phase.clone(),
            command: None,
            indicator: (list != session.source).then_some(DropIndicator::CrossList { list }),
        },
        (DragPhase::Idle, DragEvent::HoverRow { .. } | DragEvent::HoverList { .. }) => {
            Transition::to(DragPhase::Idle)
        }
        (
            phase,
            DragEvent::Drop {
                list,
                row,
                pointer_y,
                payload,
            },
        ) => {
            let session = match phase {
                DragPhase::Dragging(session) => Some(session.clone()),
                DragPhase::Idle => payload,
            };
            Transition {
                next: DragPhase::Idle,
                command: session
                    .map(|session| drop_command(session, list, row.as_ref(), pointer_y, lists)),
                indicator: None,
            }
        }
    }
}

fn drop_command(
    session: DragSession,
    list: ListKey,
    row: Option<&RowHit>,
    pointer_y: f64,
    lists: &GameLists,
) -> MoveCommand {
    // Dropping onto the dragged row itself resolves to its own index (or the slot right
    // after it), both of which are identity moves.
    let target_index = row
        .and_then(|row| {
            lists
                .position(list, &row.game_id)
                .map(|found| found + usize::from(row.is_lower_half(pointer_y)))
        })
        .unwrap_or_else(|| lists.list(list).len());

    MoveCommand {
        game_id: session.game_id,
        from: session.source,
        to: list,
        target_index,
    }
}

fn hover_row_indicator(
    session: &DragSession,
    list: ListKey,
    row: &RowHit,
    pointer_y: f64,
    lists: &GameLists,
) -> Option<DropIndicator> {
    if list != session.source {
        return Some(DropIndicator::CrossList { list });
    }
    if row.game_id == session.game_id {
        return None;
    }

    let current = lists.position(list, &row.game_id)?;
    let dragged_above = lists
        .position(list, &session.game_id)
        .is_some_and(|dragged| dragged < current);

    let (placement, index) = if row.is_lower_half(pointer_y) {
        (Placement::After, if dragged_above { current } else { current + 1 })
    } else {
        (
            Placement::Before,
            if dragged_above { current - 1 } else { current },
        )
    };

    Some(DropIndicator::Reorder {
        target: row.game_id.clone(),
        placement,
        position: index + 1,
    })
}

/// Tracks the gesture in progress for one presentation surface.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    phase: DragPhase,
}

impl DragController {
    /// Create a controller in the idle phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// Feed one event, keeping the resulting phase and returning its side effects.
    pub fn handle(
        &mut self,
        event: DragEvent,
        lists: &GameLists,
    ) -> (Option<MoveCommand>, Option<DropIndicator>) {
        let Transition {
            next,
            command,
            indicator,
        } = transition(&self.phase, event, lists);
        self.phase = next;
        (command, indicator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::list_store::ListStore;

    const ROW_HEIGHT: f64 = 40.0;

    fn store_with(list: ListKey, count: usize) -> (ListStore, Vec<GameId>) {
        let mut store = ListStore::new();
        let ids = (0..count)
            .map(|idx| store.add(&format!("G{idx}"), list, None).unwrap().id.clone())
            .collect();
        (store, ids)
    }

    fn row(id: &GameId, index: usize) -> RowHit {
        RowHit {
            game_id: id.clone(),
            top: index as f64 * ROW_HEIGHT,
            height: ROW_HEIGHT,
        }
    }

    fn upper(index: usize) -> f64 {
        index as f64 * ROW_HEIGHT + 5.0
    }

    fn lower(index: usize) -> f64 {
        index as f64 * ROW_HEIGHT + 35.0
    }

    fn start(id: &GameId, source: ListKey) -> DragEvent {
        DragEvent::Start(DragSession {
            game_id: id.clone(),
            source,
        })
    }

    #[test]
    fn initial_phase_is_idle() {
        assert_eq!(DragController::new().phase(), &DragPhase::Idle);
    }

    #[test]
    fn drop_on_lower_half_inserts_after_row() {
        let (mut store, ids) = store_with(ListKey::ToPlay, 4);
        let mut controller = DragController::new();

        controller.handle(start(&ids[0], ListKey::ToPlay), store.lists());
        let (command, _) = controller.handle(
            DragEvent::Drop {
                list: ListKey::ToPlay,
                row: Some(row(&ids[2], 2)),
                pointer_y: lower(2),
                payload: None,
            },
            store.lists(),
        );
        let command = command.unwrap();
        assert_eq!(command.target_index, 3);
        assert_eq!(controller.phase(), &DragPhase::Idle);

        store.move_game(&command.game_id, command.from, command.to, command.target_index);
        let order: Vec<_> = store.lists().to_play.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(order, ["G1", "G2", "G0", "G3"]);
    }

    #[test]
    fn drop_on_upper_half_inserts_before_row() {
        let (store, ids) = store_with(ListKey::ToPlay, 3);
        let next = transition(
            &DragPhase::Dragging(DragSession {
                game_id: ids[2].clone(),
                source: ListKey::ToPlay,
            }),
            DragEvent::Drop {
                list: ListKey::ToPlay,
                row: Some(row(&ids[1], 1)),
                pointer_y: upper(1),
                payload: None,
            },
            store.lists(),
        );
        assert_eq!(next.command.unwrap().target_index, 1);
    }

    #[test]
    fn drop_on_empty_area_appends() {
        let (mut store, ids) = store_with(ListKey::ToPlay, 2);
        store.add("Done", ListKey::Completed, None).unwrap();
        let mut controller = DragController::new();

        controller.handle(start(&ids[0], ListKey::ToPlay), store.lists());
        let (command, _) = controller.handle(
            DragEvent::Drop {
                list: ListKey::Completed,
                row: None,
                pointer_y: 0.0,
                payload: None,
            },
            store.lists(),
        );
        assert_eq!(
            command,
            Some(MoveCommand {
                game_id: ids[0].clone(),
                from: ListKey::ToPlay,
                to: ListKey::Completed,
                target_index: 1,
            })
        );
    }

    #[test]
    fn drop_on_own_row_is_identity() {
        let (mut store, ids) = store_with(ListKey::ToPlay, 3);
        let before = store.lists().clone();

        for pointer_y in [upper(1), lower(1)] {
            let mut controller = DragController::new();
            controller.handle(start(&ids[1], ListKey::ToPlay), store.lists());
            let (command, _) = controller.handle(
                DragEvent::Drop {
                    list: ListKey::ToPlay,
                    row: Some(row(&ids[1], 1)),
                    pointer_y,
                    payload: None,
                },
                store.lists(),
            );
            let command = command.unwrap();
            store.move_game(&command.game_id, command.from, command.to, command.target_index);
            assert_eq!(store.lists(), &before);
        }
    }

    #[test]
    fn idle_drop_uses_payload_or_does_nothing() {
        let (store, ids) = store_with(ListKey::ToPlay, 2);

        let without = transition(
            &DragPhase::Idle,
            DragEvent::Drop {
                list: ListKey::Finished,
                row: None,
                pointer_y: 0.0,
                payload: None,
            },
            store.lists(),
        );
        assert_eq!(without.command, None);

        let with = transition(
            &DragPhase::Idle,
            DragEvent::Drop {
                list: ListKey::Finished,
                row: None,
                pointer_y: 0.0,
                payload: Some(DragSession {
                    game_id: ids[1].clone(),
                    source: ListKey::ToPlay,
                }),
            },
            store.lists(),
        );
        assert_eq!(with.command.unwrap().to, ListKey::Finished);
    }

    #[test]
    fn end_resets_without_command() {
        let (store, ids) = store_with(ListKey::ToPlay, 1);
        let mut controller = DragController::new();
        controller.handle(start(&ids[0], ListKey::ToPlay), store.lists());
        assert!(matches!(controller.phase(), DragPhase::Dragging(_)));

        let (command, indicator) = controller.handle(DragEvent::End, store.lists());
        assert_eq!((command, indicator), (None, None));
        assert_eq!(controller.phase(), &DragPhase::Idle);
    }

    #[test]
    fn hover_in_source_list_reports_landing_position() {
        let (store, ids) = store_with(ListKey::ToPlay, 4);
        let dragging = DragPhase::Dragging(DragSession {
            game_id: ids[0].clone(),
            source: ListKey::ToPlay,
        });
        let hover = |index: usize, pointer_y: f64| {
            transition(
                &dragging,
                DragEvent::HoverRow {
                    list: ListKey::ToPlay,
                    row: row(&ids[index], index),
                    pointer_y,
                },
                store.lists(),
            )
            .indicator
        };

        assert_eq!(
            hover(2, lower(2)),
            Some(DropIndicator::Reorder {
                target: ids[2].clone(),
                placement: Placement::After,
                position: 3,
            })
        );
        assert_eq!(
            hover(2, upper(2)),
            Some(DropIndicator::Reorder {
                target: ids[2].clone(),
                placement: Placement::Before,
                position: 2,
            })
        );
        assert_eq!(hover(0, lower(0)), None);
    }

    #[test]
    fn hover_over_other_list_is_cross_list() {
        let (store, ids) = store_with(ListKey::ToPlay, 1);
        let dragging = DragPhase::Dragging(DragSession {
            game_id: ids[0].clone(),
            source: ListKey::ToPlay,
        });
        let next = transition(
            &dragging,
            DragEvent::HoverList {
                list: ListKey::Waiting,
            },
            store.lists(),
        );
        assert_eq!(
            next.indicator,
            Some(DropIndicator::CrossList {
                list: ListKey::Waiting
            })
        );
        assert_eq!(next.next, dragging);
    }

    #[test]
    fn hover_while_idle_has_no_feedback() {
        let (store, _) = store_with(ListKey::ToPlay, 1);
        let next = transition(
            &DragPhase::Idle,
            DragEvent::HoverList {
                list: ListKey::Completed,
            },
            store.lists(),
        );
        assert_eq!(next, Transition::to(DragPhase::Idle));
    }
}
