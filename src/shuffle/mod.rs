//! Shuffle choreography.
//!
//! ## Key Types
//!
//! - `LoopMotion`: Lissajous loop constants and per-card transforms
//! - `Choreographer`: gather, loop and landing driven by host frames
//! - `Stage`: the session, surface and scheduler a choreographer call works on

pub mod motion;
pub mod choreographer;

pub use motion::LoopMotion;
pub use choreographer::{Choreographer, ShufflePhase, ShuffleSession, Stage};
