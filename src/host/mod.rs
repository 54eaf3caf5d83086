//! Host collaborators.
//!
//! The board never touches a window, a DOM or a display loop directly.
//! Hosts implement these traits:
//! - `GeometryProvider`: where the row is and how big the viewport is
//! - `FrameScheduler`: one callback per display refresh, cancellable by handle
//! - `DetailView`: the overlay showing a card in full
//!
//! `headless` has in-memory implementations for tests, benchmarks and
//! hosts without a display.

pub mod headless;

pub use headless::{FixedGeometry, ManualScheduler, RecordingDetailView};

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::geometry::SurfaceGeometry;

/// Handle of a requested frame.
///
/// The host passes it back to `Board::on_frame`; a frame whose handle is
/// not the one the board is waiting for is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub u64);

impl std::fmt::Display for FrameHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}

/// Frame scheduling failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("frame scheduler is not available")]
    Unavailable,

    #[error("frame request rejected: {0}")]
    Rejected(String),
}

/// Detail view failures. Logged by the board, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("detail view failed: {0}")]
pub struct DetailViewError(pub String);

/// Source of the current surface geometry.
///
/// Read on demand so the board reacts to resizes without caching.
pub trait GeometryProvider {
    fn surface(&self) -> SurfaceGeometry;
}

/// Display-refresh scheduler.
pub trait FrameScheduler {
    /// Ask for one callback on the next refresh.
    fn request_frame(&mut self) -> Result<FrameHandle, ScheduleError>;

    /// Withdraw a request. Cancelling a spent or unknown handle is a no-op.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Overlay that displays a card in full.
pub trait DetailView {
    fn show(&mut self, card: &Card) -> Result<(), DetailViewError>;

    fn hide(&mut self);
}
