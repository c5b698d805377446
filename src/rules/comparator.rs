//! Card comparison law.
//!
//! Higher value wins, except that a Two beats an Ace.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

/// Result of comparing two cards.
///
/// The first card passed to a comparator is always read as the player's
/// card, so `PlayerWins` means "the first card wins".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    PlayerWins,
    OpponentWins,
    Tie,
}

impl Comparison {
    /// The same result seen from the other side.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Comparison::PlayerWins => Comparison::OpponentWins,
            Comparison::OpponentWins => Comparison::PlayerWins,
            Comparison::Tie => Comparison::Tie,
        }
    }
}

/// Comparison law used by the turn resolver.
pub trait CardComparator {
    /// Compare `a` (player side) against `b` (opponent side).
    fn compare(&self, a: &Card, b: &Card) -> Comparison;

    /// The stronger card; `a` on a tie.
    fn higher_card<'a>(&self, a: &'a Card, b: &'a Card) -> &'a Card {
        match self.compare(a, b) {
            Comparison::OpponentWins => b,
            Comparison::PlayerWins | Comparison::Tie => a,
        }
    }

    /// Whether the two cards tie, which is what triggers a battle.
    fn are_equal(&self, a: &Card, b: &Card) -> bool {
        self.compare(a, b) == Comparison::Tie
    }
}

/// The standard law: value order with the Two-beats-Ace inversion.
///
/// ```
/// use war_of_attrition::cards::{Card, Rank, Suit};
/// use war_of_attrition::rules::{CardComparator, Comparison, StandardComparator};
///
/// let two = Card::new(Suit::Hearts, Rank::Two);
/// let ace = Card::new(Suit::Spades, Rank::Ace);
/// assert_eq!(StandardComparator.compare(&two, &ace), Comparison::PlayerWins);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardComparator;

impl CardComparator for StandardComparator {
    fn compare(&self, a: &Card, b: &Card) -> Comparison {
        // Only a Two/Ace pair of distinct ranks inverts; Two-Two and Ace-Ace
        // fall through to the value tie below.
        match (a.rank, b.rank) {
            (Rank::Two, Rank::Ace) => return Comparison::PlayerWins,
            (Rank::Ace, Rank::Two) => return Comparison::OpponentWins,
            _ => {}
        }

        match a.value().cmp(&b.value()) {
            std::cmp::Ordering::Greater => Comparison::PlayerWins,
            std::cmp::Ordering::Less => Comparison::OpponentWins,
            std::cmp::Ordering::Equal => Comparison::Tie,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;
    use proptest::prelude::*;

    fn red(rank: Rank) -> Card {
        Card::new(Suit::Hearts, rank)
    }

    fn black(rank: Rank) -> Card {
        Card::new(Suit::Spades, rank)
    }

    #[test]
    fn test_two_beats_ace() {
        let law = StandardComparator;
        assert_eq!(law.compare(&red(Rank::Two), &black(Rank::Ace)), Comparison::PlayerWins);
        assert_eq!(law.compare(&red(Rank::Ace), &black(Rank::Two)), Comparison::OpponentWins);
        assert_eq!(law.compare(&red(Rank::Two), &black(Rank::Two)), Comparison::Tie);
        assert_eq!(law.compare(&red(Rank::Ace), &black(Rank::Ace)), Comparison::Tie);
    }

    #[test]
    fn test_value_order() {
        let law = StandardComparator;
        assert_eq!(law.compare(&red(Rank::King), &black(Rank::Queen)), Comparison::PlayerWins);
        assert_eq!(law.compare(&red(Rank::Seven), &black(Rank::Jack)), Comparison::OpponentWins);
        assert_eq!(law.compare(&red(Rank::Eight), &black(Rank::Eight)), Comparison::Tie);
        // Ace still beats everything but a Two
        assert_eq!(law.compare(&red(Rank::Three), &black(Rank::Ace)), Comparison::OpponentWins);
    }

    #[test]
    fn test_helpers() {
        let law = StandardComparator;
        let two = red(Rank::Two);
        let ace = black(Rank::Ace);
        let other_two = black(Rank::Two);

        assert_eq!(law.higher_card(&ace, &two), &two);
        assert_eq!(law.higher_card(&two, &other_two), &two);
        assert!(law.are_equal(&two, &other_two));
        assert!(!law.are_equal(&two, &ace));
    }

    fn any_rank() -> impl Strategy<Value = Rank> {
        proptest::sample::select(Rank::ALL.to_vec())
    }

    fn any_suit() -> impl Strategy<Value = Suit> {
        proptest::sample::select(Suit::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_swapping_inverts(r1 in any_rank(), r2 in any_rank(), s1 in any_suit(), s2 in any_suit()) {
            let a = Card::new(s1, r1);
            let b = Card::new(s2, r2);
            let law = StandardComparator;
            prop_assert_eq!(law.compare(&a, &b), law.compare(&b, &a).inverse());
        }

        #[test]
        fn prop_value_order_outside_two_ace(r1 in any_rank(), r2 in any_rank()) {
            prop_assume!(!matches!((r1, r2), (Rank::Two, Rank::Ace) | (Rank::Ace, Rank::Two)));
            let expected = match r1.value().cmp(&r2.value()) {
                std::cmp::Ordering::Greater => Comparison::PlayerWins,
                std::cmp::Ordering::Less => Comparison::OpponentWins,
                std::cmp::Ordering::Equal => Comparison::Tie,
            };
            prop_assert_eq!(StandardComparator.compare(&red(r1), &black(r2)), expected);
        }

        #[test]
        fn prop_suit_never_matters(r in any_rank(), s1 in any_suit(), s2 in any_suit()) {
            prop_assert_eq!(
                StandardComparator.compare(&Card::new(s1, r), &Card::new(s2, r)),
                Comparison::Tie
            );
        }
    }
}
