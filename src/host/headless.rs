//! In-memory host collaborators.
//!
//! ```
//! use card_table::host::{FrameScheduler, ManualScheduler};
//!
//! let mut scheduler = ManualScheduler::new();
//! let handle = scheduler.request_frame().unwrap();
//! assert_eq!(scheduler.pending(), Some(handle));
//!
//! scheduler.cancel_frame(handle);
//! scheduler.cancel_frame(handle); // no-op
//! assert_eq!(scheduler.pending(), None);
//! ```

use super::{DetailView, DetailViewError, FrameHandle, FrameScheduler, GeometryProvider, ScheduleError};
use crate::cards::{Card, CardId};
use crate::core::geometry::{Rect, Size, SurfaceGeometry};

/// Scheduler driven by hand: the caller decides when frames happen.
///
/// At most one frame is pending at a time, as with a display loop that
/// reschedules itself once per frame.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    pending: Option<FrameHandle>,
    fail_requests: bool,
    requested: usize,
    cancelled: usize,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The frame waiting to be delivered, if any.
    #[must_use]
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Take the pending frame for delivery.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Make subsequent requests fail (or succeed again).
    pub fn set_failing(&mut self, failing: bool) {
        self.fail_requests = failing;
    }

    /// Successful requests so far.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Cancellations that withdrew a pending frame.
    #[must_use]
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, ScheduleError> {
        if self.fail_requests {
            return Err(ScheduleError::Unavailable);
        }
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        self.requested += 1;
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

/// Geometry that only changes when told to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedGeometry(pub SurfaceGeometry);

impl FixedGeometry {
    /// A row of `row_width` x `row_height` sitting at the bottom-left of a
    /// `viewport` sized surface.
    #[must_use]
    pub fn bottom_row(viewport: Size, row_width: f64, row_height: f64) -> Self {
        Self(SurfaceGeometry::new(
            Rect::new(0.0, viewport.height - row_height, row_width, row_height),
            viewport,
        ))
    }

    pub fn set(&mut self, surface: SurfaceGeometry) {
        self.0 = surface;
    }
}

impl GeometryProvider for FixedGeometry {
    fn surface(&self) -> SurfaceGeometry {
        self.0
    }
}

/// Detail view that records calls instead of drawing.
#[derive(Clone, Debug, Default)]
pub struct RecordingDetailView {
    shown: Vec<CardId>,
    hidden: usize,
    fail: bool,
}

impl RecordingDetailView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A view whose `show` always fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Cards shown, in call order.
    #[must_use]
    pub fn shown(&self) -> &[CardId] {
        &self.shown
    }

    /// Number of `hide` calls.
    #[must_use]
    pub fn hidden(&self) -> usize {
        self.hidden
    }
}

impl DetailView for RecordingDetailView {
    fn show(&mut self, card: &Card) -> Result<(), DetailViewError> {
        if self.fail {
            return Err(DetailViewError(format!("cannot render {}", card.display_name)));
        }
        self.shown.push(card.id.clone());
        Ok(())
    }

    fn hide(&mut self) {
        self.hidden += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardSpec;

    #[test]
    fn test_manual_scheduler_handles_are_unique() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame().unwrap();
        let b = scheduler.request_frame().unwrap();

        assert_ne!(a, b);
        assert_eq!(scheduler.pending(), Some(b));

        // Cancelling a superseded handle does nothing
        scheduler.cancel_frame(a);
        assert_eq!(scheduler.pending(), Some(b));
        assert_eq!(scheduler.cancelled(), 0);
    }

    #[test]
    fn test_manual_scheduler_failure() {
        let mut scheduler = ManualScheduler::new();
        scheduler.set_failing(true);
        assert_eq!(scheduler.request_frame(), Err(ScheduleError::Unavailable));
        assert_eq!(scheduler.requested(), 0);
    }

    #[test]
    fn test_bottom_row() {
        let geometry = FixedGeometry::bottom_row(Size::new(1000.0, 800.0), 500.0, 140.0);
        assert_eq!(geometry.surface().row, Rect::new(0.0, 660.0, 500.0, 140.0));
    }

    #[test]
    fn test_recording_detail_view() {
        let card = Card::from_spec(CardSpec::new("maj-0", "The Fool"));

        let mut view = RecordingDetailView::new();
        view.show(&card).unwrap();
        view.hide();
        assert_eq!(view.shown(), &[CardId::new("maj-0")]);
        assert_eq!(view.hidden(), 1);

        let mut broken = RecordingDetailView::failing();
        assert!(broken.show(&card).is_err());
        assert!(broken.shown().is_empty());
    }
}
