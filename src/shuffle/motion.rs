//! Loop motion: the per-frame transform of every card during the shuffle.
//!
//! Cards trace a Lissajous figure-eight around the focal point,
//! `(Rx cos t, Ry sin 2t)`, with depth `Rz sin t`. Card `i` runs
//! `i * phase_offset` ahead of card 0, which strings the deck out into a
//! snake instead of moving it in lockstep.
//!
//! Everything here is a pure function of (time, ordinal, constants).

use serde::{Deserialize, Serialize};

use crate::core::geometry::Transform3d;
use crate::layout::depth_to_z;

/// Constants of the loop motion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopMotion {
    /// Time advance per frame.
    pub time_step: f64,
    /// Time shift between consecutive cards.
    pub phase_offset: f64,
    /// Horizontal radius (pixels).
    pub radius_x: f64,
    /// Vertical radius (pixels).
    pub radius_y: f64,
    /// Depth radius (pixels).
    pub radius_z: f64,
    /// Uniform scale while looping.
    pub scale: f64,
    /// Added to depth before flooring into a z-index.
    pub depth_bias: f64,
}

impl Default for LoopMotion {
    fn default() -> Self {
        Self {
            time_step: 0.025,
            phase_offset: 0.08,
            radius_x: 300.0,
            radius_y: 100.0,
            radius_z: 150.0,
            scale: 0.8,
            depth_bias: 200.0,
        }
    }
}

impl LoopMotion {
    /// Phase-shifted time of card `ordinal`.
    #[must_use]
    pub fn card_time(&self, time: f64, ordinal: usize) -> f64 {
        time + ordinal as f64 * self.phase_offset
    }

    /// Transform of card `ordinal` at loop time `time`, relative to the
    /// focal point.
    #[must_use]
    pub fn transform(&self, time: f64, ordinal: usize) -> Transform3d {
        let t = self.card_time(time, ordinal);
        Transform3d {
            x: self.radius_x * t.cos(),
            y: self.radius_y * (2.0 * t).sin(),
            z: self.radius_z * t.sin(),
            rotation_deg: 0.0,
            scale: self.scale,
        }
    }

    /// Z-index for a transform's depth: nearer cards draw on top.
    #[must_use]
    pub fn z_index(&self, transform: &Transform3d) -> i32 {
        depth_to_z(transform.z, self.depth_bias)
    }

    /// One frame for `count` cards: every transform comes from the same
    /// `time`.
    pub fn frame(&self, time: f64, count: usize) -> impl Iterator<Item = (Transform3d, i32)> + '_ {
        (0..count).map(move |i| {
            let transform = self.transform(time, i);
            (transform, self.z_index(&transform))
        })
    }
}
