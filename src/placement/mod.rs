//! Placement: where each card is and in which coordinate regime.
//!
//! - `PlacementController`: per-card records behind one transition function
//! - `BoardSession`: the store, placements, z counter and RNG of one board,
//!   with the row operations (realign, detach, rejoin) built on them

pub mod controller;
pub mod session;

pub use controller::{Motion, Placement, PlacementController, PlacementMode, PlacementRecord, Transition};
pub use session::BoardSession;
