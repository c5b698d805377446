//! Decks and the discard pile.
//!
//! Both are backed by `im::Vector`, so cloning them for a snapshot or a
//! checkpoint is O(1) regardless of size.
//!
//! Index 0 is the bottom of a deck and the last index is the top: `draw`
//! pops from the back, `add_card` pushes to the front.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::{Card, Rank, Suit};
use crate::core::rng::GameRng;

/// Cards a deck needs to fight a battle: one reveal plus three battle cards.
pub const MIN_CARDS_FOR_BATTLE: usize = 4;

/// An ordered stack of cards.
///
/// ```
/// use war_of_attrition::cards::{Card, Deck, Rank, Suit};
///
/// let mut deck = Deck::from_cards([
///     Card::new(Suit::Hearts, Rank::Two),
///     Card::new(Suit::Hearts, Rank::Three),
/// ]);
///
/// // Draw from the top
/// assert_eq!(deck.draw(), Some(Card::new(Suit::Hearts, Rank::Three)));
///
/// // Returned cards go to the bottom
/// deck.add_card(Card::new(Suit::Hearts, Rank::Ace));
/// assert_eq!(deck.draw(), Some(Card::new(Suit::Hearts, Rank::Two)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// Create an empty deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deck from cards listed bottom to top.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// All 52 cards, unshuffled.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_suits(&Suit::ALL)
    }

    /// The 26 hearts and diamonds, unshuffled.
    #[must_use]
    pub fn red() -> Self {
        Self::with_suits(&Suit::RED)
    }

    /// The 26 clubs and spades, unshuffled.
    #[must_use]
    pub fn black() -> Self {
        Self::with_suits(&Suit::BLACK)
    }

    fn with_suits(suits: &[Suit]) -> Self {
        Self::from_cards(
            suits
                .iter()
                .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(suit, rank))),
        )
    }

    /// Shuffle in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards = self.to_vec();
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
    }

    /// Remove and return the top card, or `None` if the deck is empty.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_back()
    }

    /// Draw up to `count` cards, stopping early if the deck runs out.
    pub fn draw_multiple(&mut self, count: usize) -> Vec<Card> {
        let mut drawn = Vec::with_capacity(count.min(self.cards.len()));
        while drawn.len() < count {
            match self.draw() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        drawn
    }

    /// Put a card on the bottom.
    pub fn add_card(&mut self, card: Card) {
        self.cards.push_front(card);
    }

    /// Put a batch on the bottom, keeping its order: the first card of the
    /// batch becomes the bottom card.
    pub fn add_cards<'a>(&mut self, cards: impl IntoIterator<Item = &'a Card>) {
        let batch: Vec<Card> = cards.into_iter().copied().collect();
        for card in batch.into_iter().rev() {
            self.cards.push_front(card);
        }
    }

    /// Remove a specific card wherever it sits. Returns whether it was found.
    pub fn remove(&mut self, card: &Card) -> bool {
        match self.cards.index_of(card) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    /// The top card without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&Card> {
        self.cards.back()
    }

    /// An independent deck sharing the same card values.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether this deck can stake a reveal plus three battle cards.
    #[must_use]
    pub fn has_minimum_for_battle(&self) -> bool {
        self.has_at_least(MIN_CARDS_FOR_BATTLE)
    }

    /// Whether this deck holds at least `count` cards.
    #[must_use]
    pub fn has_at_least(&self, count: usize) -> bool {
        self.cards.len() >= count
    }

    /// Cards bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Copy of the cards, bottom to top.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Card> {
        self.cards.iter().copied().collect()
    }

    /// Empty the deck.
    pub fn reset(&mut self) {
        self.cards.clear();
    }
}

/// Cards removed from play. Append-only for the life of a match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardPile {
    cards: Vector<Card>,
}

impl DiscardPile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn extend<'a>(&mut self, cards: impl IntoIterator<Item = &'a Card>) {
        for card in cards {
            self.cards.push_back(*card);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Most recently discarded card.
    #[must_use]
    pub fn last(&self) -> Option<&Card> {
        self.cards.back()
    }

    /// Discards in order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    /// Only called when a match is torn down.
    pub fn clear(&mut self) {
        self.cards.clear();
    }
}
