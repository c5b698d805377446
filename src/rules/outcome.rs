//! Turn outcomes.
//!
//! A `TurnOutcome` describes what one resolution step did. The resolver has
//! already applied the card moves by the time it is returned; callers use it
//! to pick messages and drive their own flags, never to re-derive rules.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::comparator::Comparison;
use crate::cards::Card;
use crate::core::{Phase, Side};

/// Up to 8 cards: the most a single step can move (two 4-card stakes).
pub type CardList = SmallVec<[Card; 8]>;

/// Result of one resolution step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Who won this step, if it is decided.
    pub winner: Option<Side>,
    /// The deciding comparison, player's card first.
    pub comparison: Comparison,
    pub message: String,
    /// Cards lost by the losing side (discarded, or about to be once a
    /// pending challenge closes).
    pub cards_lost: CardList,
    /// Cards kept, or held for the next battle round.
    pub cards_kept: CardList,
    pub next_phase: Phase,
    /// The player lost the reveal and may challenge.
    pub player_may_challenge: bool,
    /// The opponent lost the reveal and has chosen to challenge.
    pub opponent_is_challenging: bool,
}

impl TurnOutcome {
    pub(crate) fn new(
        winner: Option<Side>,
        comparison: Comparison,
        message: impl Into<String>,
        next_phase: Phase,
    ) -> Self {
        Self {
            winner,
            comparison,
            message: message.into(),
            cards_lost: CardList::new(),
            cards_kept: CardList::new(),
            next_phase,
            player_may_challenge: false,
            opponent_is_challenging: false,
        }
    }

    /// A match that ended without a comparison, e.g. a deck ran out.
    pub(crate) fn match_over(winner: Option<Side>, message: impl Into<String>) -> Self {
        let comparison = match winner {
            Some(Side::Player) => Comparison::PlayerWins,
            Some(Side::Opponent) => Comparison::OpponentWins,
            None => Comparison::Tie,
        };
        Self::new(winner, comparison, message, Phase::GameOver)
    }

    pub(crate) fn lost<'a>(mut self, cards: impl IntoIterator<Item = &'a Card>) -> Self {
        self.cards_lost.extend(cards.into_iter().copied());
        self
    }

    pub(crate) fn kept<'a>(mut self, cards: impl IntoIterator<Item = &'a Card>) -> Self {
        self.cards_kept.extend(cards.into_iter().copied());
        self
    }

    /// Whether this step ended the match.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.next_phase == Phase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn test_match_over_comparison() {
        let outcome = TurnOutcome::match_over(Some(Side::Opponent), "out of cards");
        assert_eq!(outcome.comparison, Comparison::OpponentWins);
        assert!(outcome.is_game_over());
        assert!(outcome.cards_lost.is_empty());
    }

    #[test]
    fn test_outcome_serialization() {
        let card = Card::new(Suit::Hearts, Rank::Four);
        let outcome = TurnOutcome::new(Some(Side::Player), Comparison::PlayerWins, "win", Phase::Normal)
            .kept(&[card]);

        let json = serde_json::to_string(&outcome).unwrap();
        let deserialized: TurnOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome, deserialized);
    }
}
