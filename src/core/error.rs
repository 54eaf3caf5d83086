//! Error types.
//!
//! None of these are fatal to a running board. Public entry points that
//! face user input (pointer events, frames) log and swallow them; the
//! `Result`s exist so internal operations can bail out early with `?`
//! and leave state untouched.

use crate::cards::CardId;
use crate::placement::PlacementMode;

/// Errors raised by board operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardError {
    #[error("card id `{0}` appears more than once")]
    DuplicateCard(CardId),

    #[error("card `{0}` is not on the board")]
    UnknownCard(CardId),

    #[error("card `{card}` cannot go from {from} to {to}")]
    IllegalTransition {
        card: CardId,
        from: PlacementMode,
        to: PlacementMode,
    },

    #[error("card `{0}` cannot animate while no shuffle loop is running")]
    AnimationOutsideLoop(CardId),

    #[error("new deck order is not a permutation of the current one")]
    OrderMismatch,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("card size must be positive, got {width}x{height}")]
    CardSize { width: f64, height: f64 },

    #[error("`{name}` must be a non-negative number of milliseconds, got {value}")]
    NegativeDuration { name: &'static str, value: f64 },

    #[error("settle delay ({settle_ms} ms) must exceed the landing transition ({transition_ms} ms)")]
    SettleTooShort { settle_ms: f64, transition_ms: f64 },

    #[error("drop band height and drag threshold must be non-negative")]
    NegativeDistance,

    #[error("loop time step must be positive, got {0}")]
    TimeStep(f64),

    #[error("depth bias {bias} does not keep depth-derived z-index positive for depth {depth}")]
    DepthBias { bias: f64, depth: f64 },
}
