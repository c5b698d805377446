//! Cards, decks and the discard pile.
//!
//! - `Card`: immutable suit + rank value with derived strength and colour
//! - `Deck`: ordered stack; draw from the top, return cards to the bottom
//! - `DiscardPile`: cards permanently out of play

pub mod card;
pub mod deck;

pub use card::{Card, Rank, Suit};
pub use deck::{Deck, DiscardPile, MIN_CARDS_FOR_BATTLE};
