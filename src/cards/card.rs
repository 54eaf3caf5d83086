//! Card identities and face state.

use serde::{Deserialize, Serialize};

/// Stable, host-assigned card identifier (e.g. `"maj-0"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(String);

impl CardId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the host hands to `initialize_board`: an id and a display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSpec {
    pub id: CardId,
    pub display_name: String,
}

impl CardSpec {
    pub fn new(id: impl Into<CardId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Which side of the card faces the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceState {
    #[default]
    Hidden,
    Revealed,
}

/// A card on the board.
///
/// Created once per `initialize_board`; only its face changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub display_name: String,
    pub face: FaceState,
}

impl Card {
    /// A face-down card built from its spec.
    #[must_use]
    pub fn from_spec(spec: CardSpec) -> Self {
        Self {
            id: spec.id,
            display_name: spec.display_name,
            face: FaceState::Hidden,
        }
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.face == FaceState::Revealed
    }

    /// Turn face up. Returns `false` if it already was.
    pub fn reveal(&mut self) -> bool {
        let changed = self.face == FaceState::Hidden;
        self.face = FaceState::Revealed;
        changed
    }

    /// Turn face down.
    pub fn hide(&mut self) {
        self.face = FaceState::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_conversions() {
        let a: CardId = "maj-0".into();
        let b: CardId = String::from("maj-0").into();

        assert_eq!(a, b);
        assert_eq!(a.as_str(), "maj-0");
        assert_eq!(format!("{}", a), "maj-0");
    }

    #[test]
    fn test_reveal_is_one_way() {
        let mut card = Card::from_spec(CardSpec::new("maj-1", "The Magician"));
        assert!(!card.is_revealed());

        assert!(card.reveal());
        assert!(!card.reveal());
        assert!(card.is_revealed());

        card.hide();
        assert_eq!(card.face, FaceState::Hidden);
    }

    #[test]
    fn test_serialization() {
        let id = CardId::new("Cups-Ace");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Cups-Ace\"");
        let back: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
