//! Stacking order.
//!
//! Two regimes share one z axis:
//! - `bring_to_front` hands out ever-increasing values from a counter
//! - `restack` assigns 1..N to a laid-out sequence, bypassing the counter
//!
//! The counter starts above any realistic row length so a raised card
//! stays above the row after the row is restacked.

/// Monotonic top-most z allocator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZOrder {
    highest: i32,
}

impl ZOrder {
    #[must_use]
    pub fn new(initial: i32) -> Self {
        Self { highest: initial }
    }

    /// Allocate a z above everything handed out so far.
    pub fn bring_to_front(&mut self) -> i32 {
        self.highest += 1;
        self.highest
    }

    /// The last value handed out (or the initial value).
    #[must_use]
    pub fn highest(&self) -> i32 {
        self.highest
    }
}

/// Pair each item with z = 1..N in sequence order, so later (further
/// right) items draw over earlier ones.
pub fn restack<T>(sequence: impl IntoIterator<Item = T>) -> impl Iterator<Item = (T, i32)> {
    sequence.into_iter().zip(1..)
}

/// Map a loop depth value to a positive z-index. Larger depth (nearer the
/// viewer) maps to a larger z.
#[must_use]
pub fn depth_to_z(depth: f64, bias: f64) -> i32 {
    ((depth + bias).floor() as i32).max(1)
}
