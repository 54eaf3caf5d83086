//! Cards and the entity store.
//!
//! ## Key Types
//!
//! - `CardId`: Host-assigned stable identifier
//! - `CardSpec`: Id plus display name, the input to board initialization
//! - `Card`: A card on the board with its face state
//! - `EntityStore`: All cards plus the logical deck order

pub mod card;
pub mod store;

pub use card::{Card, CardId, CardSpec, FaceState};
pub use store::EntityStore;
