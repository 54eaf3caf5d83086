//! Fan layout for the deck row.
//!
//! Cards are spread evenly across the row, overlapping as needed: slot 0
//! has its left edge at 0 and the last slot has its right edge at the
//! row's right edge. Positions are relative to the row's top-left corner.

use crate::core::geometry::Point;

/// Layout of `count` cards of width `card_width` across `container_width`.
///
/// Cheap to build; construct a fresh one whenever width or count changes
/// rather than caching slots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanLayout {
    step: f64,
    count: usize,
}

impl FanLayout {
    /// Compute the layout.
    ///
    /// Degenerate inputs (non-positive width, zero count) produce a single
    /// fixed slot at the origin. A container narrower than one card stacks
    /// every card at the origin.
    #[must_use]
    pub fn new(container_width: f64, card_width: f64, count: usize) -> Self {
        if !(container_width > 0.0) || count == 0 {
            return Self { step: 0.0, count };
        }
        let span = (container_width - card_width).max(0.0);
        let gaps = count.saturating_sub(1).max(1);
        Self {
            step: span / gaps as f64,
            count,
        }
    }

    /// Horizontal distance between consecutive slots.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Row-relative position of slot `index`. `y` is always the baseline.
    #[must_use]
    pub fn slot(&self, index: usize) -> Point {
        Point::new(index as f64 * self.step, 0.0)
    }

    /// All slots, in index order.
    pub fn slots(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.count).map(move |i| self.slot(i))
    }
}

/// Row-relative position of slot `index` among `count` cards.
#[must_use]
pub fn slot_position(container_width: f64, card_width: f64, count: usize, index: usize) -> Point {
    FanLayout::new(container_width, card_width, count).slot(index)
}
