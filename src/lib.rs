//! # card-table
//!
//! Interaction and shuffle choreography core for a virtual card table.
//!
//! ## Design Principles
//!
//! 1. **Host-Agnostic**: No window, DOM or display loop. Geometry, frame
//!    scheduling and the detail overlay are traits the host implements.
//!
//! 2. **One Placement Authority**: Every card is in exactly one of row,
//!    free or animating mode, and every change goes through one transition
//!    function.
//!
//! 3. **Frame-Driven**: The shuffle advances only when the host delivers a
//!    frame, so tests drive it with synthetic timestamps.
//!
//! ## Architecture
//!
//! - **Derived Row Positions**: A row card's position is a function of its
//!   rank in the deck order and the row width, recomputed on demand.
//!
//! - **Persistent Deck Order**: The order is an `im` vector, so the
//!   shuffle snapshots it in O(1).
//!
//! - **Seeded Randomness**: ChaCha8 streams per purpose; a fixed seed
//!   replays the same gather tilts and permutations.
//!
//! ## Modules
//!
//! - `core`: Geometry, configuration, RNG, errors
//! - `cards`: Card identities, face state, the entity store
//! - `layout`: Fan layout and z-order
//! - `placement`: Placement controller and board session
//! - `interaction`: Drag state machine and input routing
//! - `shuffle`: Loop motion and the shuffle choreographer
//! - `host`: Collaborator traits and headless implementations
//! - `board`: The `Board` hosts drive, its events and render snapshots
//! - `decks`: Ready-made decks

pub mod core;
pub mod cards;
pub mod layout;
pub mod placement;
pub mod interaction;
pub mod shuffle;
pub mod host;
pub mod board;
pub mod decks;

// Re-export commonly used types
pub use crate::core::{
    BoardConfig, BoardError, BoardRng, ConfigError,
    Point, Pose, Rect, Size, SurfaceGeometry, Transform3d,
};

pub use crate::cards::{Card, CardId, CardSpec, EntityStore, FaceState};

pub use crate::layout::{slot_position, FanLayout, ZOrder};

pub use crate::placement::{
    BoardSession, Motion, Placement, PlacementController, PlacementMode, PlacementRecord, Transition,
};

pub use crate::interaction::{DragMachine, DragOutcome, DragPhase, PointerButton, PointerEvent, PointerId, PointerKind};

pub use crate::shuffle::{Choreographer, LoopMotion, ShufflePhase};

pub use crate::host::{
    DetailView, DetailViewError, FrameHandle, FrameScheduler, GeometryProvider, ScheduleError,
    FixedGeometry, ManualScheduler, RecordingDetailView,
};

pub use crate::board::{Board, BoardEvent, CardVisual};
