//! Board session: the state one `initialize_board` call creates.
//!
//! Holds the entity store, the placement records, the bring-to-front
//! counter and the RNG streams, and implements the row operations on top
//! of them. Reinitializing the board replaces the whole session, which
//! resets the z counter along with everything else.

use rustc_hash::FxHashSet;

use super::controller::{
    Motion, Placement, PlacementController, PlacementMode, PlacementRecord, Transition,
};
use crate::cards::{CardId, CardSpec, EntityStore};
use crate::core::config::BoardConfig;
use crate::core::error::BoardError;
use crate::core::geometry::{Point, Rect, SurfaceGeometry};
use crate::core::rng::BoardRng;
use crate::layout::{restack, FanLayout, ZOrder};

/// Cards, placements, z counter and RNG of one board.
#[derive(Clone, Debug)]
pub struct BoardSession {
    config: BoardConfig,
    store: EntityStore,
    placements: PlacementController,
    z_order: ZOrder,
    permutation_rng: BoardRng,
    jitter_rng: BoardRng,
}

impl BoardSession {
    /// Build a session with every card in the row, in the given order.
    ///
    /// The row is not realigned yet; callers do that once geometry is known.
    pub fn new(config: BoardConfig, specs: impl IntoIterator<Item = CardSpec>) -> Result<Self, BoardError> {
        let store = EntityStore::from_specs(specs)?;
        let mut placements = PlacementController::new();
        placements.reset(store.order().iter());

        let rng = BoardRng::from_seed_option(config.seed);
        Ok(Self {
            z_order: ZOrder::new(config.initial_top_z),
            permutation_rng: rng.for_context("permutation"),
            jitter_rng: rng.for_context("gather"),
            config,
            store,
            placements,
        })
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    #[must_use]
    pub fn placements(&self) -> &PlacementController {
        &self.placements
    }

    #[must_use]
    pub fn z_order(&self) -> &ZOrder {
        &self.z_order
    }

    #[must_use]
    pub fn record(&self, id: &CardId) -> Option<&PlacementRecord> {
        self.placements.get(id)
    }

    /// Apply a placement transition.
    pub fn apply(&mut self, id: &CardId, transition: Transition) -> Result<PlacementMode, BoardError> {
        self.placements.apply(id, transition)
    }

    pub fn set_z(&mut self, id: &CardId, z_index: i32) -> Result<(), BoardError> {
        self.placements.set_z(id, z_index)
    }

    pub fn begin_loop(&mut self) {
        self.placements.begin_loop();
    }

    pub fn end_loop(&mut self) {
        self.placements.end_loop();
    }

    /// Cards currently in the row, in deck order.
    #[must_use]
    pub fn row_ids(&self) -> Vec<CardId> {
        self.store
            .order()
            .iter()
            .filter(|id| self.placements.mode(id) == Some(PlacementMode::Row))
            .cloned()
            .collect()
    }

    /// Fan layout for the current row membership and width.
    #[must_use]
    pub fn row_layout(&self, surface: &SurfaceGeometry) -> FanLayout {
        FanLayout::new(surface.row.size.width, self.config.card_size.width, self.row_ids().len())
    }

    /// Absolute top-left corner of a card as currently displayed.
    ///
    /// Row cards derive it from their slot; animating cards add the planar
    /// part of their transform to the anchor.
    #[must_use]
    pub fn visual_position(&self, id: &CardId, surface: &SurfaceGeometry) -> Option<Point> {
        match self.placements.get(id)?.placement {
            Placement::Row => {
                let row = self.row_ids();
                let index = row.iter().position(|r| r == id)?;
                let layout = FanLayout::new(surface.row.size.width, self.config.card_size.width, row.len());
                Some(surface.row.origin + layout.slot(index))
            }
            Placement::Free { position, .. } => Some(position),
            Placement::Animating { anchor, transform } => Some(anchor + transform.offset()),
        }
    }

    /// Hit box of a card.
    #[must_use]
    pub fn bounds(&self, id: &CardId, surface: &SurfaceGeometry) -> Option<Rect> {
        self.visual_position(id, surface)
            .map(|origin| Rect::from_origin(origin, self.config.card_size))
    }

    /// Restack the row 1..N left to right and ask the renderer to ease every
    /// row card into its freshly computed slot. Returns the row length.
    pub fn realign(&mut self) -> usize {
        let motion = Motion::Smooth {
            duration_ms: self.config.realign_transition_ms,
        };
        let row = self.row_ids();
        let count = row.len();
        for (id, z) in restack(row) {
            // Row ids come from the store, so the records exist.
            let _ = self.placements.set_z(&id, z);
            let _ = self.placements.set_motion(&id, motion);
        }
        count
    }

    /// Take a card out of the row (or keep it free) at exactly the position
    /// it is displayed at. Realigns the row if the card left it.
    pub fn detach(&mut self, id: &CardId, surface: &SurfaceGeometry) -> Result<Point, BoardError> {
        let at = self
            .visual_position(id, surface)
            .ok_or_else(|| BoardError::UnknownCard(id.clone()))?;
        let was_row = self.placements.mode(id) == Some(PlacementMode::Row);

        self.placements.apply(id, Transition::Detach { at })?;
        if was_row {
            self.realign();
        }
        Ok(at)
    }

    /// Raise a card above everything else.
    pub fn raise(&mut self, id: &CardId) -> Result<i32, BoardError> {
        if !self.store.contains(id) {
            return Err(BoardError::UnknownCard(id.clone()));
        }
        let z = self.z_order.bring_to_front();
        self.placements.set_z(id, z)?;
        Ok(z)
    }

    /// Put a free card back into the row.
    ///
    /// The row cards and the returning card are sorted by their horizontal
    /// position (row-relative) and become the front of the deck order; the
    /// remaining free cards follow in their previous relative order. The
    /// whole row is then realigned.
    pub fn rejoin_row(&mut self, id: &CardId, surface: &SurfaceGeometry) -> Result<(), BoardError> {
        let mode = self
            .placements
            .mode(id)
            .ok_or_else(|| BoardError::UnknownCard(id.clone()))?;
        if mode != PlacementMode::Free {
            return Err(BoardError::IllegalTransition {
                card: id.clone(),
                from: mode,
                to: PlacementMode::Row,
            });
        }

        let returning_x = self
            .visual_position(id, surface)
            .map(|p| p.x - surface.row.origin.x)
            .ok_or_else(|| BoardError::UnknownCard(id.clone()))?;

        let row = self.row_ids();
        let layout = FanLayout::new(surface.row.size.width, self.config.card_size.width, row.len());
        let mut entries: Vec<(CardId, f64)> = row
            .into_iter()
            .enumerate()
            .map(|(i, card)| (card, layout.slot(i).x))
            .collect();
        entries.push((id.clone(), returning_x));
        // Stable: on a tie the returning card goes after the row card.
        entries.sort_by(|a, b| a.1.total_cmp(&b.1));

        let joined: FxHashSet<CardId> = entries.iter().map(|(card, _)| card.clone()).collect();
        let mut new_order: Vec<CardId> = entries.into_iter().map(|(card, _)| card).collect();
        new_order.extend(self.store.order().iter().filter(|card| !joined.contains(*card)).cloned());

        self.store.set_order(new_order)?;
        self.placements.apply(id, Transition::Attach)?;
        self.realign();
        Ok(())
    }

    /// Uniformly permute the deck order.
    pub fn permute_order(&mut self) {
        self.store.permute(&mut self.permutation_rng);
    }

    /// Random tilt for a gathered card.
    pub fn gather_tilt(&mut self) -> f64 {
        self.jitter_rng.gen_signed(self.config.gather_max_tilt_deg)
    }
}
