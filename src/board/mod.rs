//! The board: the surface hosts drive.
//!
//! `Board` ties the session, the drag machine and the shuffle
//! choreographer to the host's collaborators. Hosts forward pointer
//! events, frames and resizes, call the shuffle controls, and read back
//! `visuals()` and `drain_events()`.
//!
//! ## Usage
//!
//! ```
//! use card_table::board::{Board, BoardEvent};
//! use card_table::cards::{CardSpec, FaceState};
//! use card_table::core::{BoardConfig, Size};
//! use card_table::host::{FixedGeometry, ManualScheduler, RecordingDetailView};
//! use card_table::interaction::{PointerEvent, PointerId};
//!
//! let geometry = FixedGeometry::bottom_row(Size::new(1000.0, 1000.0), 500.0, 140.0);
//! let mut board = Board::new(
//!     BoardConfig::default().with_seed(7),
//!     geometry,
//!     ManualScheduler::new(),
//!     RecordingDetailView::new(),
//! )
//! .unwrap();
//!
//! board
//!     .initialize_board(vec![CardSpec::new("maj-0", "The Fool"), CardSpec::new("maj-1", "The Magician")])
//!     .unwrap();
//!
//! // Tap the first card
//! board.handle_pointer(PointerEvent::down(PointerId(1), 20.0, 900.0));
//! board.handle_pointer(PointerEvent::up(PointerId(1), 20.0, 900.0));
//!
//! let events = board.drain_events();
//! assert_eq!(events[0], BoardEvent::Tapped { card: "maj-0".into(), face: FaceState::Revealed });
//! ```

mod events;

pub use events::{BoardEvent, CardVisual};

use smallvec::SmallVec;
use tracing::{debug, info, trace, warn};

use crate::cards::{CardId, CardSpec, FaceState};
use crate::core::config::BoardConfig;
use crate::core::error::BoardError;
use crate::core::geometry::Point;
use crate::host::{DetailView, FrameHandle, FrameScheduler, GeometryProvider};
use crate::interaction::{self, DragMachine, DragOutcome, DragPhase, PointerEvent};
use crate::layout::FanLayout;
use crate::placement::{BoardSession, PlacementMode};
use crate::shuffle::{Choreographer, ShufflePhase, Stage};

/// A card table bound to its host collaborators.
pub struct Board<G: GeometryProvider, S: FrameScheduler, D: DetailView> {
    config: BoardConfig,
    session: BoardSession,
    drag: DragMachine,
    choreographer: Choreographer,
    events: Vec<BoardEvent>,
    geometry: G,
    scheduler: S,
    detail: D,
}

impl<G: GeometryProvider, S: FrameScheduler, D: DetailView> Board<G, S, D> {
    /// Create an empty board. Fails if `config` does not validate.
    pub fn new(config: BoardConfig, geometry: G, scheduler: S, detail: D) -> Result<Self, BoardError> {
        config.validate()?;
        let session = BoardSession::new(config.clone(), Vec::new())?;
        Ok(Self {
            config,
            session,
            drag: DragMachine::new(),
            choreographer: Choreographer::new(),
            events: Vec::new(),
            geometry,
            scheduler,
            detail,
        })
    }

    /// Replace every card with `specs`, all face down in the row.
    ///
    /// Any running shuffle or drag is dropped and the z counter starts
    /// over. On error the current board is left as it was.
    pub fn initialize_board(&mut self, specs: impl IntoIterator<Item = CardSpec>) -> Result<(), BoardError> {
        let session = BoardSession::new(self.config.clone(), specs)?;

        self.choreographer.abandon(&mut self.scheduler);
        self.collect_phase_changes();
        self.drag.cancel();
        self.session = session;
        let count = self.session.realign();
        info!("[board] initialized with {} cards", count);
        Ok(())
    }

    /// Start a shuffle. Returns `false` if one is already running or the
    /// board is empty.
    pub fn trigger_shuffle(&mut self) -> bool {
        let started = self.with_stage(|choreographer, stage| choreographer.trigger(stage));
        if started {
            self.drag.cancel();
        }
        started
    }

    /// Stop the loop and land the cards. Returns `false` (and does nothing)
    /// unless the shuffle is looping.
    pub fn stop_shuffle(&mut self) -> bool {
        self.with_stage(|choreographer, stage| choreographer.stop(stage))
    }

    /// A frame requested from the scheduler has arrived.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp_ms: f64) {
        self.with_stage(|choreographer, stage| choreographer.on_frame(handle, timestamp_ms, stage));
    }

    /// The pending frame was lost or its callback failed.
    pub fn on_frame_error(&mut self) {
        self.with_stage(|choreographer, stage| choreographer.on_frame_error(stage));
    }

    /// Feed one pointer event. Ignored while a shuffle runs.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if self.choreographer.is_active() {
            trace!("[board] pointer ignored while {}", self.choreographer.phase());
            return;
        }
        let surface = self.geometry.surface();
        match interaction::route(&mut self.drag, &mut self.session, &surface, &event) {
            Ok(Some(outcome)) => self.dispatch(outcome),
            Ok(None) => {}
            Err(err) => debug!("[board] pointer event discarded: {}", err),
        }
    }

    /// Recompute the row, e.g. after the host resized the surface.
    pub fn realign(&mut self) -> usize {
        self.session.realign()
    }

    /// Close the detail view.
    pub fn dismiss_detail(&mut self) {
        self.detail.hide();
    }

    /// Events since the previous call, oldest first.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Render snapshot of every card, in deck order.
    #[must_use]
    pub fn visuals(&self) -> Vec<CardVisual> {
        let surface = self.geometry.surface();
        let row = self.session.row_ids();
        let layout = FanLayout::new(surface.row.size.width, self.config.card_size.width, row.len());

        let mut rank = 0;
        self.session
            .store()
            .ordered()
            .filter_map(|card| {
                let record = self.session.record(&card.id)?;
                let row_position = surface.row.origin + layout.slot(rank);
                if record.mode() == PlacementMode::Row {
                    rank += 1;
                }
                Some(CardVisual::from_record(card.id.clone(), card.face, record, row_position))
            })
            .collect()
    }

    /// Render snapshot of one card.
    #[must_use]
    pub fn visual(&self, id: &CardId) -> Option<CardVisual> {
        let surface = self.geometry.surface();
        let card = self.session.store().get(id)?;
        let record = self.session.record(id)?;
        let position = self.session.visual_position(id, &surface)?;
        // For row cards the visual position is the slot itself.
        Some(CardVisual::from_record(id.clone(), card.face, record, position))
    }

    /// Cards under `point`, topmost first.
    #[must_use]
    pub fn cards_at(&self, point: Point) -> SmallVec<[CardId; 4]> {
        interaction::cards_at(&self.session, &self.geometry.surface(), point)
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &BoardSession {
        &self.session
    }

    #[must_use]
    pub fn shuffle_phase(&self) -> ShufflePhase {
        self.choreographer.phase()
    }

    #[must_use]
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    #[must_use]
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[must_use]
    pub fn detail(&self) -> &D {
        &self.detail
    }

    pub fn detail_mut(&mut self) -> &mut D {
        &mut self.detail
    }

    fn with_stage<R>(&mut self, f: impl FnOnce(&mut Choreographer, &mut Stage<'_, S>) -> R) -> R {
        let mut stage = Stage {
            session: &mut self.session,
            surface: self.geometry.surface(),
            scheduler: &mut self.scheduler,
        };
        let result = f(&mut self.choreographer, &mut stage);
        self.collect_phase_changes();
        result
    }

    fn collect_phase_changes(&mut self) {
        let changes = self.choreographer.take_phase_changes();
        self.events
            .extend(changes.into_iter().map(|phase| BoardEvent::ShufflePhaseChanged { phase }));
    }

    fn dispatch(&mut self, outcome: DragOutcome) {
        match outcome {
            DragOutcome::Revealed { card } => {
                self.events.push(BoardEvent::Tapped {
                    card,
                    face: FaceState::Revealed,
                });
            }
            DragOutcome::DetailRequested { card } => {
                self.events.push(BoardEvent::Tapped {
                    card: card.clone(),
                    face: FaceState::Revealed,
                });
                if let Some(entity) = self.session.store().get(&card) {
                    if let Err(err) = self.detail.show(entity) {
                        warn!("[board] {}", err);
                    }
                }
                self.events.push(BoardEvent::DetailRequested { card });
            }
            DragOutcome::Dropped {
                card,
                position,
                rejoined_row,
            } => {
                self.events.push(BoardEvent::DragEnded {
                    card,
                    position,
                    rejoined_row,
                });
            }
        }
    }
}

impl<G, S, D> std::fmt::Debug for Board<G, S, D>
where
    G: GeometryProvider,
    S: FrameScheduler,
    D: DetailView,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("cards", &self.session.store().len())
            .field("shuffle", &self.choreographer.phase())
            .field("drag", &self.drag.phase())
            .field("pending_events", &self.events.len())
            .finish()
    }
}
