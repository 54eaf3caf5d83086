//! Input router: hit-testing and pointer dispatch.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use super::drag::{DragMachine, DragOutcome};
use crate::cards::CardId;
use crate::core::error::BoardError;
use crate::core::geometry::{Point, SurfaceGeometry};
use crate::placement::BoardSession;

/// Identifier of a pointer (mouse, pen or touch contact).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerId(pub u32);

impl std::fmt::Display for PointerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pointer({})", self.0)
    }
}

/// Which button a press used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Other(u16),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pointer: PointerId,
    pub button: PointerButton,
    pub position: Point,
}

impl PointerEvent {
    #[must_use]
    pub fn new(kind: PointerKind, pointer: PointerId, position: Point) -> Self {
        Self {
            kind,
            pointer,
            button: PointerButton::Primary,
            position,
        }
    }

    /// Primary-button press.
    #[must_use]
    pub fn down(pointer: PointerId, x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, pointer, Point::new(x, y))
    }

    #[must_use]
    pub fn moved(pointer: PointerId, x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, pointer, Point::new(x, y))
    }

    #[must_use]
    pub fn up(pointer: PointerId, x: f64, y: f64) -> Self {
        Self::new(PointerKind::Up, pointer, Point::new(x, y))
    }

    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

/// Cards whose bounds contain `point`, topmost first.
///
/// Higher z wins; equal z falls back to deck order, later cards on top.
pub fn cards_at(session: &BoardSession, surface: &SurfaceGeometry, point: Point) -> SmallVec<[CardId; 4]> {
    let mut hits: SmallVec<[(i32, usize, CardId); 4]> = session
        .store()
        .order()
        .iter()
        .enumerate()
        .filter(|(_, id)| {
            session
                .bounds(id, surface)
                .is_some_and(|bounds| bounds.contains(point))
        })
        .filter_map(|(ordinal, id)| {
            let z = session.record(id)?.z_index;
            Some((z, ordinal, id.clone()))
        })
        .collect();

    hits.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
    hits.into_iter().map(|(_, _, id)| id).collect()
}

/// Topmost card under `point`.
#[must_use]
pub fn hit_test(session: &BoardSession, surface: &SurfaceGeometry, point: Point) -> Option<CardId> {
    cards_at(session, surface, point).into_iter().next()
}

/// Dispatch one pointer event into the drag machine.
///
/// Presses hit-test the topmost card and must use the primary button;
/// moves and releases go to whatever the pointer holds.
pub fn route(
    drag: &mut DragMachine,
    session: &mut BoardSession,
    surface: &SurfaceGeometry,
    event: &PointerEvent,
) -> Result<Option<DragOutcome>, BoardError> {
    match event.kind {
        PointerKind::Down => {
            if event.button != PointerButton::Primary {
                trace!("[input] ignoring {:?} press", event.button);
                return Ok(None);
            }
            let Some(card) = hit_test(session, surface, event.position) else {
                trace!("[input] press at {} hit nothing", event.position);
                return Ok(None);
            };
            drag.press(session, surface, &card, event.pointer, event.position)?;
            Ok(None)
        }
        PointerKind::Move => {
            drag.motion(session, event.pointer, event.position)?;
            Ok(None)
        }
        PointerKind::Up => drag.release(session, surface, event.pointer, event.position),
    }
}
