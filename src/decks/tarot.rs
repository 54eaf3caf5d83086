//! The 78-card tarot deck.
//!
//! Major arcana have ids `maj-0` to `maj-21`. Minor arcana have ids
//! `<Suit>-<Rank>` (e.g. `Cups-Queen`) and are named `<Rank> of <Suit>`.

use crate::cards::CardSpec;

pub const SUITS: [&str; 4] = ["Wands", "Cups", "Swords", "Pentacles"];

pub const RANKS: [&str; 14] = [
    "Ace", "2", "3", "4", "5", "6", "7", "8", "9", "10", "Page", "Knight", "Queen", "King",
];

pub const MAJOR_ARCANA: [&str; 22] = [
    "The Fool",
    "The Magician",
    "The High Priestess",
    "The Empress",
    "The Emperor",
    "The Hierophant",
    "The Lovers",
    "The Chariot",
    "Strength",
    "The Hermit",
    "Wheel of Fortune",
    "Justice",
    "The Hanged Man",
    "Death",
    "Temperance",
    "The Devil",
    "The Tower",
    "The Star",
    "The Moon",
    "The Sun",
    "Judgement",
    "The World",
];

/// The 22 major arcana in numbered order.
pub fn major_arcana() -> impl Iterator<Item = CardSpec> {
    MAJOR_ARCANA
        .iter()
        .enumerate()
        .map(|(i, name)| CardSpec::new(format!("maj-{}", i), *name))
}

/// The 56 minor arcana, suit by suit.
pub fn minor_arcana() -> impl Iterator<Item = CardSpec> {
    SUITS.iter().flat_map(|suit| {
        RANKS
            .iter()
            .map(move |rank| CardSpec::new(format!("{}-{}", suit, rank), format!("{} of {}", rank, suit)))
    })
}

/// Full deck: major arcana first, then the minor arcana.
#[must_use]
pub fn standard_deck() -> Vec<CardSpec> {
    major_arcana().chain(minor_arcana()).collect()
}
