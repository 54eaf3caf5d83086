//! Ready-made decks.
//!
//! The board works with any list of `CardSpec`s; these are provided for
//! hosts that just want a familiar deck on the table.

pub mod tarot;
