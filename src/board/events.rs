//! Board events and render snapshots.
//!
//! Events are queued while the board handles host calls and handed out by
//! `Board::drain_events`, oldest first. `CardVisual` is what a renderer
//! needs to draw one card.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, FaceState};
use crate::core::geometry::{Point, Transform3d};
use crate::placement::{Motion, Placement, PlacementMode, PlacementRecord};
use crate::shuffle::ShufflePhase;

/// Something the host may want to react to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// A card was tapped; `face` is its face after the tap.
    Tapped { card: CardId, face: FaceState },
    /// A face-up card was tapped and its detail was requested.
    DetailRequested { card: CardId },
    /// A drag finished with the card's top-left corner at `position`.
    DragEnded {
        card: CardId,
        position: Point,
        rejoined_row: bool,
    },
    /// The shuffle entered `phase`.
    ShufflePhaseChanged { phase: ShufflePhase },
}

impl BoardEvent {
    /// Card the event is about, if any.
    #[must_use]
    pub fn card(&self) -> Option<&CardId> {
        match self {
            BoardEvent::Tapped { card, .. }
            | BoardEvent::DetailRequested { card }
            | BoardEvent::DragEnded { card, .. } => Some(card),
            BoardEvent::ShufflePhaseChanged { .. } => None,
        }
    }
}

/// Render snapshot of one card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardVisual {
    pub id: CardId,
    /// Absolute top-left corner the transform applies to.
    pub position: Point,
    /// Translation, depth, rotation and scale relative to `position`.
    pub transform: Transform3d,
    pub z_index: i32,
    pub face: FaceState,
    pub mode: PlacementMode,
    /// How to get from the previous frame's look to this one.
    pub motion: Motion,
}

impl CardVisual {
    /// Build from a record; `row_position` is the slot position, used only
    /// for row cards.
    pub(crate) fn from_record(id: CardId, face: FaceState, record: &PlacementRecord, row_position: Point) -> Self {
        let (position, transform) = match record.placement {
            Placement::Row => (row_position, Transform3d::IDENTITY),
            Placement::Free { position, pose } => (position, Transform3d::from_pose(pose)),
            Placement::Animating { anchor, transform } => (anchor, transform),
        };
        Self {
            id,
            position,
            transform,
            z_index: record.z_index,
            face,
            mode: record.mode(),
            motion: record.motion,
        }
    }

    /// Where the card's top-left corner ends up on screen.
    #[must_use]
    pub fn displayed_at(&self) -> Point {
        self.position + self.transform.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Pose;

    #[test]
    fn test_event_card() {
        let tapped = BoardEvent::Tapped {
            card: CardId::new("maj-0"),
            face: FaceState::Revealed,
        };
        assert_eq!(tapped.card(), Some(&CardId::new("maj-0")));

        let phase = BoardEvent::ShufflePhaseChanged {
            phase: ShufflePhase::Looping,
        };
        assert_eq!(phase.card(), None);
    }

    #[test]
    fn test_visual_from_animating_record() {
        let record = PlacementRecord {
            placement: Placement::Animating {
                anchor: Point::new(455.0, 430.0),
                transform: Transform3d {
                    x: 300.0,
                    y: -20.0,
                    z: 10.0,
                    rotation_deg: 0.0,
                    scale: 0.8,
                },
            },
            z_index: 210,
            motion: Motion::Instant,
        };
        let visual = CardVisual::from_record(CardId::new("a"), FaceState::Hidden, &record, Point::ORIGIN);

        assert_eq!(visual.position, Point::new(455.0, 430.0));
        assert_eq!(visual.displayed_at(), Point::new(755.0, 410.0));
        assert_eq!(visual.mode, PlacementMode::Animating);
    }

    #[test]
    fn test_visual_from_free_record() {
        let record = PlacementRecord {
            placement: Placement::Free {
                position: Point::new(10.0, 20.0),
                pose: Pose::new(3.0, 0.8),
            },
            z_index: 101,
            motion: Motion::Smooth { duration_ms: 800.0 },
        };
        let visual = CardVisual::from_record(CardId::new("a"), FaceState::Revealed, &record, Point::ORIGIN);

        assert_eq!(visual.displayed_at(), Point::new(10.0, 20.0));
        assert_eq!(visual.transform.rotation_deg, 3.0);
        assert_eq!(visual.transform.scale, 0.8);
    }

    #[test]
    fn test_event_json_shape() {
        let event = BoardEvent::DragEnded {
            card: CardId::new("Cups-Ace"),
            position: Point::new(1.0, 2.0),
            rejoined_row: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: BoardEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
