//! Core types: geometry, configuration, RNG and errors.
//!
//! Everything here is independent of cards and placement; the other
//! modules build on it.

pub mod geometry;
pub mod config;
pub mod rng;
pub mod error;

pub use geometry::{Point, Pose, Rect, Size, SurfaceGeometry, Transform3d};
pub use config::BoardConfig;
pub use rng::BoardRng;
pub use error::{BoardError, ConfigError};
