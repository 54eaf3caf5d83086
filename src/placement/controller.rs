//! Placement controller: per-card placement mode and coordinates.
//!
//! Every placement change goes through [`PlacementController::apply`],
//! which checks the transition against the card's current mode:
//!
//! ```text
//!            Detach              Animate (loop only)
//!   Row ───────────────▶ Free ─────────────────────▶ Animating
//!    ▲                    │ ▲                            │
//!    └──── Attach ────────┘ └──────────── Land ──────────┘
//! ```
//!
//! `Reposition` moves a free card; `Detach` on a free card just moves it
//! too. Animating is reachable only while the shuffle loop is active
//! (`begin_loop`/`end_loop`), so outside the loop no card animates.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::error::BoardError;
use crate::core::geometry::{Point, Pose, Transform3d};

/// Coarse placement mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementMode {
    /// Position derived from the card's slot in the row.
    Row,
    /// Explicit absolute position on the table.
    Free,
    /// Driven each frame by the shuffle loop.
    Animating,
}

impl std::fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PlacementMode::Row => "row",
            PlacementMode::Free => "free",
            PlacementMode::Animating => "animating",
        })
    }
}

/// Placement with the data valid for its mode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    Row,
    Free {
        /// Absolute top-left corner.
        position: Point,
        pose: Pose,
    },
    Animating {
        /// Absolute top-left corner the transform is relative to.
        anchor: Point,
        transform: Transform3d,
    },
}

impl Placement {
    #[must_use]
    pub fn mode(&self) -> PlacementMode {
        match self {
            Placement::Row => PlacementMode::Row,
            Placement::Free { .. } => PlacementMode::Free,
            Placement::Animating { .. } => PlacementMode::Animating,
        }
    }
}

/// How the renderer should reach the current placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Jump there (drag tracking, per-frame loop updates).
    Instant,
    /// Animate there over `duration_ms`.
    Smooth { duration_ms: f64 },
}

/// Everything the controller tracks for one card.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub placement: Placement,
    pub z_index: i32,
    pub motion: Motion,
}

impl PlacementRecord {
    #[must_use]
    pub fn mode(&self) -> PlacementMode {
        self.placement.mode()
    }
}

impl Default for PlacementRecord {
    fn default() -> Self {
        Self {
            placement: Placement::Row,
            z_index: 0,
            motion: Motion::Instant,
        }
    }
}

/// A requested placement change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    /// Leave the row (or stay free) at `at`, upright, without animation.
    Detach { at: Point },
    /// Move a free card.
    Reposition {
        position: Point,
        pose: Pose,
        motion: Motion,
    },
    /// Join the row; the explicit position is discarded.
    Attach,
    /// Enter or update the loop motion.
    Animate {
        anchor: Point,
        transform: Transform3d,
    },
    /// Leave the loop (or retarget a free card) towards `position`, upright.
    Land { position: Point, motion: Motion },
}

impl Transition {
    /// Mode the card ends up in.
    #[must_use]
    pub fn target(&self) -> PlacementMode {
        match self {
            Transition::Detach { .. } | Transition::Reposition { .. } | Transition::Land { .. } => {
                PlacementMode::Free
            }
            Transition::Attach => PlacementMode::Row,
            Transition::Animate { .. } => PlacementMode::Animating,
        }
    }
}

/// Placement records for every card on the board.
#[derive(Clone, Debug, Default)]
pub struct PlacementController {
    records: FxHashMap<CardId, PlacementRecord>,
    loop_active: bool,
}

impl PlacementController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all records and put every given card in the row.
    pub fn reset<'a>(&mut self, ids: impl IntoIterator<Item = &'a CardId>) {
        self.records = ids
            .into_iter()
            .map(|id| (id.clone(), PlacementRecord::default()))
            .collect();
        self.loop_active = false;
    }

    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&PlacementRecord> {
        self.records.get(id)
    }

    #[must_use]
    pub fn mode(&self, id: &CardId) -> Option<PlacementMode> {
        self.records.get(id).map(PlacementRecord::mode)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CardId, &PlacementRecord)> + '_ {
        self.records.iter()
    }

    #[must_use]
    pub fn loop_active(&self) -> bool {
        self.loop_active
    }

    /// Number of cards currently animating.
    #[must_use]
    pub fn animating_count(&self) -> usize {
        self.records
            .values()
            .filter(|r| r.mode() == PlacementMode::Animating)
            .count()
    }

    /// Allow cards to animate.
    pub fn begin_loop(&mut self) {
        self.loop_active = true;
    }

    /// Forbid animation again. Every card must already have landed.
    pub fn end_loop(&mut self) {
        debug_assert_eq!(self.animating_count(), 0, "loop ended with animating cards");
        self.loop_active = false;
    }

    /// Apply a transition, returning the new mode.
    ///
    /// On error the record is unchanged.
    pub fn apply(&mut self, id: &CardId, transition: Transition) -> Result<PlacementMode, BoardError> {
        let loop_active = self.loop_active;
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownCard(id.clone()))?;
        let from = record.mode();

        let illegal = || BoardError::IllegalTransition {
            card: id.clone(),
            from,
            to: transition.target(),
        };

        match (from, transition) {
            (PlacementMode::Row | PlacementMode::Free, Transition::Detach { at }) => {
                record.placement = Placement::Free {
                    position: at,
                    pose: Pose::IDENTITY,
                };
                record.motion = Motion::Instant;
            }
            (
                PlacementMode::Free,
                Transition::Reposition {
                    position,
                    pose,
                    motion,
                },
            ) => {
                record.placement = Placement::Free { position, pose };
                record.motion = motion;
            }
            (PlacementMode::Row | PlacementMode::Free, Transition::Attach) => {
                record.placement = Placement::Row;
            }
            (PlacementMode::Free | PlacementMode::Animating, Transition::Animate { anchor, transform }) => {
                if !loop_active {
                    return Err(BoardError::AnimationOutsideLoop(id.clone()));
                }
                record.placement = Placement::Animating { anchor, transform };
                record.motion = Motion::Instant;
            }
            (PlacementMode::Free | PlacementMode::Animating, Transition::Land { position, motion }) => {
                record.placement = Placement::Free {
                    position,
                    pose: Pose::IDENTITY,
                };
                record.motion = motion;
            }
            _ => return Err(illegal()),
        }

        Ok(record.mode())
    }

    /// Set a card's z-index.
    pub fn set_z(&mut self, id: &CardId, z_index: i32) -> Result<(), BoardError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownCard(id.clone()))?;
        record.z_index = z_index;
        Ok(())
    }

    /// Set the motion hint of a card without moving it.
    pub fn set_motion(&mut self, id: &CardId, motion: Motion) -> Result<(), BoardError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownCard(id.clone()))?;
        record.motion = motion;
        Ok(())
    }
}
