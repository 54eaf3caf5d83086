//! Pointer interaction.
//!
//! - `router`: hit-testing and dispatch of raw pointer events
//! - `drag`: the press / move / release state machine for one held card

pub mod drag;
pub mod router;

pub use drag::{DragMachine, DragOutcome, DragPhase};
pub use router::{cards_at, hit_test, route, PointerButton, PointerEvent, PointerId, PointerKind};
