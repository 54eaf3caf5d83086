//! Drag interaction state machine.
//!
//! ```text
//!  Idle ──press──▶ Armed ──move past threshold──▶ Dragging
//!   ▲                │                               │
//!   └──── release (tap) ◀───────┘      release (drop) ┘
//! ```
//!
//! A press detaches the card at exactly the spot it is drawn and raises it.
//! Releasing without having moved is a tap; releasing after moving drops
//! the card, back into the row when the pointer is inside the drop band.
//! Only one card is held at a time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::router::PointerId;
use crate::cards::CardId;
use crate::core::error::BoardError;
use crate::core::geometry::{Point, Pose, SurfaceGeometry};
use crate::placement::{BoardSession, Motion, Transition};

/// Public view of the machine's state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragPhase {
    #[default]
    Idle,
    Armed,
    Dragging,
}

impl std::fmt::Display for DragPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DragPhase::Idle => "idle",
            DragPhase::Armed => "armed",
            DragPhase::Dragging => "dragging",
        })
    }
}

/// The card being held and where it was picked up.
#[derive(Clone, Debug, PartialEq)]
struct Grab {
    card: CardId,
    pointer: PointerId,
    /// Pointer position minus the card's top-left corner at press time.
    grab_offset: Point,
    /// Pointer position at press time.
    origin: Point,
}

#[derive(Clone, Debug, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Armed(Grab),
    Dragging(Grab),
}

/// What a release did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DragOutcome {
    /// Tap on a hidden card: it is now face up.
    Revealed { card: CardId },
    /// Tap on a face-up card: the host should show its detail.
    DetailRequested { card: CardId },
    /// Drag ended with the card's top-left corner at `position`.
    Dropped {
        card: CardId,
        position: Point,
        rejoined_row: bool,
    },
}

impl DragOutcome {
    #[must_use]
    pub fn card(&self) -> &CardId {
        match self {
            DragOutcome::Revealed { card }
            | DragOutcome::DetailRequested { card }
            | DragOutcome::Dropped { card, .. } => card,
        }
    }
}

/// Single-pointer drag machine.
#[derive(Clone, Debug, Default)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        match self.state {
            DragState::Idle => DragPhase::Idle,
            DragState::Armed(_) => DragPhase::Armed,
            DragState::Dragging(_) => DragPhase::Dragging,
        }
    }

    /// The card currently held, if any.
    #[must_use]
    pub fn active_card(&self) -> Option<&CardId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Armed(grab) | DragState::Dragging(grab) => Some(&grab.card),
        }
    }

    /// Pick up `card`. Returns `false` if another card is already held.
    pub fn press(
        &mut self,
        session: &mut BoardSession,
        surface: &SurfaceGeometry,
        card: &CardId,
        pointer: PointerId,
        at: Point,
    ) -> Result<bool, BoardError> {
        if let Some(held) = self.active_card() {
            debug!("[drag] press on {} ignored, holding {}", card, held);
            return Ok(false);
        }

        let position = session.detach(card, surface)?;
        let z = session.raise(card)?;
        self.state = DragState::Armed(Grab {
            card: card.clone(),
            pointer,
            grab_offset: at - position,
            origin: at,
        });
        debug!("[drag] armed {} at {} (z {})", card, position, z);
        Ok(true)
    }

    /// Pointer moved. The first move past the threshold starts the drag;
    /// while dragging the card follows the pointer exactly.
    pub fn motion(&mut self, session: &mut BoardSession, pointer: PointerId, at: Point) -> Result<(), BoardError> {
        let threshold = session.config().drag_threshold;
        self.state = match std::mem::take(&mut self.state) {
            DragState::Armed(grab) if grab.pointer == pointer && at.distance(grab.origin) > threshold => {
                debug!("[drag] dragging {}", grab.card);
                DragState::Dragging(grab)
            }
            other => other,
        };

        let DragState::Dragging(grab) = &self.state else {
            return Ok(());
        };
        if grab.pointer != pointer {
            return Ok(());
        }
        let transition = Transition::Reposition {
            position: at - grab.grab_offset,
            pose: Pose::IDENTITY,
            motion: Motion::Instant,
        };
        if let Err(err) = session.apply(&grab.card, transition) {
            self.state = DragState::Idle;
            return Err(err);
        }
        Ok(())
    }

    /// Pointer released: a tap or a drop. `None` if nothing was held by
    /// this pointer.
    pub fn release(
        &mut self,
        session: &mut BoardSession,
        surface: &SurfaceGeometry,
        pointer: PointerId,
        at: Point,
    ) -> Result<Option<DragOutcome>, BoardError> {
        match &self.state {
            DragState::Idle => return Ok(None),
            DragState::Armed(grab) | DragState::Dragging(grab) if grab.pointer != pointer => return Ok(None),
            _ => {}
        }

        match std::mem::take(&mut self.state) {
            DragState::Idle => Ok(None),
            DragState::Armed(grab) => tap(session, grab.card).map(Some),
            DragState::Dragging(grab) => drop_card(session, surface, grab, at).map(Some),
        }
    }

    /// Let go of the held card where it is.
    pub fn cancel(&mut self) {
        if let Some(card) = self.active_card() {
            debug!("[drag] cancelled {}", card);
        }
        self.state = DragState::Idle;
    }
}

fn tap(session: &mut BoardSession, card: CardId) -> Result<DragOutcome, BoardError> {
    let entity = session.store_mut().require_mut(&card)?;
    if entity.reveal() {
        debug!("[drag] revealed {}", card);
        Ok(DragOutcome::Revealed { card })
    } else {
        debug!("[drag] detail for {}", card);
        Ok(DragOutcome::DetailRequested { card })
    }
}

fn drop_card(
    session: &mut BoardSession,
    surface: &SurfaceGeometry,
    grab: Grab,
    at: Point,
) -> Result<DragOutcome, BoardError> {
    let position = at - grab.grab_offset;
    session.apply(
        &grab.card,
        Transition::Reposition {
            position,
            pose: Pose::IDENTITY,
            motion: Motion::Instant,
        },
    )?;

    if !surface.in_drop_band(at.y, session.config().drop_band_height) {
        debug!("[drag] dropped {} at {}", grab.card, position);
        return Ok(DragOutcome::Dropped {
            card: grab.card,
            position,
            rejoined_row: false,
        });
    }

    session.rejoin_row(&grab.card, surface)?;
    let position = session
        .visual_position(&grab.card, surface)
        .ok_or_else(|| BoardError::UnknownCard(grab.card.clone()))?;
    debug!("[drag] {} rejoined the row at {}", grab.card, position);
    Ok(DragOutcome::Dropped {
        card: grab.card,
        position,
        rejoined_row: true,
    })
}
