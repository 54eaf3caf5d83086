//! Geometry primitives shared by layout, placement and the shuffle loop.
//!
//! All coordinates are pixels. Absolute coordinates are viewport-relative
//! with the origin at the top-left corner and `y` growing downwards, the
//! same convention the host's pointer events use.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point (or offset) in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Half of each dimension, as an offset.
    #[must_use]
    pub fn half(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    #[must_use]
    pub const fn from_origin(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    /// Whether `point` lies inside. Left and top edges are inclusive,
    /// right and bottom exclusive.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x < self.right()
            && point.y >= self.origin.y
            && point.y < self.bottom()
    }
}

/// Snapshot of the host's surface: where the deck row sits and how large
/// the viewport is.
///
/// Read from the [`GeometryProvider`](crate::host::GeometryProvider) each
/// time it is needed, never cached across events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    /// Deck row bounds in viewport coordinates.
    pub row: Rect,
    /// Viewport size.
    pub viewport: Size,
}

impl SurfaceGeometry {
    #[must_use]
    pub const fn new(row: Rect, viewport: Size) -> Self {
        Self { row, viewport }
    }

    /// Top-left position that centers a card of `card` size in the viewport.
    #[must_use]
    pub fn focal_point(&self, card: Size) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0) - card.half()
    }

    /// Whether a pointer at height `y` is inside the drop band: the bottom
    /// `band_height` pixels of the viewport.
    #[must_use]
    pub fn in_drop_band(&self, y: f64, band_height: f64) -> bool {
        y > self.viewport.height - band_height
    }
}

/// Rotation and scale applied to a free card (the "messy pile" look).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub rotation_deg: f64,
    pub scale: f64,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        rotation_deg: 0.0,
        scale: 1.0,
    };

    #[must_use]
    pub const fn new(rotation_deg: f64, scale: f64) -> Self {
        Self {
            rotation_deg,
            scale,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Render transform relative to a card's anchor: 3D offset plus rotation
/// and uniform scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation_deg: f64,
    pub scale: f64,
}

impl Transform3d {
    pub const IDENTITY: Transform3d = Transform3d {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        rotation_deg: 0.0,
        scale: 1.0,
    };

    /// A transform with no translation, carrying only a pose.
    #[must_use]
    pub const fn from_pose(pose: Pose) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotation_deg: pose.rotation_deg,
            scale: pose.scale,
        }
    }

    /// The planar part of the translation.
    #[must_use]
    pub const fn offset(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Default for Transform3d {
    fn default() -> Self {
        Self::IDENTITY
    }
}
