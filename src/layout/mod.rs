//! Layout engine and z-order manager.
//!
//! - `FanLayout` / `slot_position`: evenly spaced, overlapping deck row slots
//! - `ZOrder` / `restack` / `depth_to_z`: stacking values

pub mod fan;
pub mod zorder;

pub use fan::{slot_position, FanLayout};
pub use zorder::{depth_to_z, restack, ZOrder};
