//! Turn resolution state machine.
//!
//! ```text
//! Normal    -> Normal | Challenge | Battle | GameOver
//! Challenge -> Normal | Battle | GameOver
//! Battle    -> Normal | Battle | GameOver
//! ```
//!
//! Cards from a contestable step stay staged in the active turn and are
//! committed to a deck or the discard pile exactly once, when the step that
//! holds them closes.

use tracing::debug;

use super::comparator::{CardComparator, Comparison, StandardComparator};
use super::outcome::{CardList, TurnOutcome};
use crate::ai::{ChallengePolicy, ChallengeTable};
use crate::cards::Card;
use crate::core::{MatchConfig, MatchState, Phase, Side, Stake};

/// Applies the rules to a match state.
///
/// Generic over the comparison law and the opponent's challenge policy so
/// tests can pin either down.
#[derive(Clone, Debug)]
pub struct TurnResolver<C = StandardComparator, P = ChallengeTable> {
    comparator: C,
    policy: P,
    opponent_challenges: bool,
}

impl TurnResolver {
    /// Standard law and the configured challenge table.
    #[must_use]
    pub fn new(config: &MatchConfig) -> Self {
        Self::with_parts(
            StandardComparator,
            ChallengeTable::with_overrides(&config.challenge_overrides),
            config.opponent_challenges,
        )
    }
}

impl Default for TurnResolver {
    fn default() -> Self {
        Self::new(&MatchConfig::default())
    }
}

impl<C: CardComparator, P: ChallengePolicy> TurnResolver<C, P> {
    pub fn with_parts(comparator: C, policy: P, opponent_challenges: bool) -> Self {
        Self {
            comparator,
            policy,
            opponent_challenges,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Resolve a Normal-phase reveal.
    pub fn resolve_turn(&self, state: &mut MatchState, player_card: Card, opponent_card: Card) -> TurnOutcome {
        let comparison = self.comparator.compare(&player_card, &opponent_card);
        debug!(player = %player_card, opponent = %opponent_card, ?comparison, "resolving reveal");

        match comparison {
            Comparison::PlayerWins => {
                if self.opponent_challenges && self.policy.should_challenge(&opponent_card, state.rng_mut()) {
                    state.stage_challenge(player_card, opponent_card, Side::Opponent);
                    let mut outcome = TurnOutcome::new(
                        None,
                        comparison,
                        "Opponent challenges your win!",
                        Phase::Challenge,
                    )
                    .lost(&[opponent_card])
                    .kept(&[player_card]);
                    outcome.opponent_is_challenging = true;
                    outcome
                } else {
                    self.commit_reveal(state, player_card, opponent_card, Side::Player, "You win this turn!")
                }
            }
            Comparison::OpponentWins => {
                state.stage_challenge(player_card, opponent_card, Side::Player);
                let mut outcome = TurnOutcome::new(
                    Some(Side::Opponent),
                    comparison,
                    "Opponent wins this turn!",
                    Phase::Challenge,
                )
                .lost(&[player_card])
                .kept(&[opponent_card]);
                outcome.player_may_challenge = true;
                outcome
            }
            Comparison::Tie => {
                if state.can_battle() {
                    state.hold_battle(
                        player_card,
                        opponent_card,
                        Stake::holding(player_card),
                        Stake::holding(opponent_card),
                    );
                    TurnOutcome::new(None, comparison, "Cards tie! Preparing for battle...", Phase::Battle)
                        .kept(&[player_card, opponent_card])
                } else {
                    state.discard(&[player_card, opponent_card]);
                    state.finish(None);
                    TurnOutcome::new(
                        None,
                        comparison,
                        "Battle cannot be conducted - insufficient cards. Game ends.",
                        Phase::GameOver,
                    )
                    .lost(&[player_card, opponent_card])
                }
            }
        }
    }

    /// Commit a staged reveal whose loser did not (or could not) challenge.
    pub fn resolve_declined_challenge(
        &self,
        state: &mut MatchState,
        player_card: Card,
        opponent_card: Card,
        challenger: Side,
    ) -> TurnOutcome {
        debug!(%challenger, "challenge declined");
        let message = match challenger {
            Side::Player => "You declined the challenge. Your card is discarded.",
            Side::Opponent => "The opponent backs down. You win this turn!",
        };
        self.commit_reveal(state, player_card, opponent_card, challenger.opposite(), message)
    }

    /// Resolve the player's challenge card against the opponent's reveal.
    pub fn resolve_challenge(
        &self,
        state: &mut MatchState,
        original_player_card: Card,
        original_opponent_card: Card,
        challenge_card: Card,
    ) -> TurnOutcome {
        let comparison = self.comparator.compare(&challenge_card, &original_opponent_card);
        debug!(challenge = %challenge_card, opponent = %original_opponent_card, ?comparison, "resolving player challenge");

        if comparison == Comparison::PlayerWins {
            state.return_to_deck(Side::Player, &[original_player_card, challenge_card]);
            state.discard(&[original_opponent_card]);
            state.close_turn();
            return TurnOutcome::new(
                Some(Side::Player),
                comparison,
                "Challenge successful! You keep your cards.",
                Phase::Normal,
            )
            .lost(&[original_opponent_card])
            .kept(&[original_player_card, challenge_card]);
        }

        state.discard(&[original_player_card, challenge_card]);
        state.return_to_deck(Side::Opponent, &[original_opponent_card]);

        let (message, next_phase) = match comparison {
            Comparison::Tie if state.can_battle() => {
                // Every card of the reveal is committed; the battle stakes
                // only the hands about to be dealt.
                state.hold_battle(
                    original_player_card,
                    original_opponent_card,
                    Stake::default(),
                    Stake::default(),
                );
                ("Challenge ties! You lose your cards. A battle decides the turn.", Phase::Battle)
            }
            Comparison::Tie => {
                state.finish(None);
                (
                    "Challenge ties! You lose your cards, and there are not enough cards for a battle. Game ends.",
                    Phase::GameOver,
                )
            }
            _ => {
                state.close_turn();
                ("Challenge failed! You lose your cards.", Phase::Normal)
            }
        };

        TurnOutcome::new(Some(Side::Opponent), comparison, message, next_phase)
            .lost(&[original_player_card, challenge_card])
            .kept(&[original_opponent_card])
    }

    /// Resolve the opponent's challenge card against the player's reveal.
    ///
    /// Unlike a player challenge, a tie here settles the turn for the player.
    pub fn resolve_opponent_challenge(
        &self,
        state: &mut MatchState,
        player_card: Card,
        opponent_card: Card,
        opponent_challenge_card: Card,
    ) -> TurnOutcome {
        let comparison = self.comparator.compare(&player_card, &opponent_challenge_card);
        debug!(player = %player_card, challenge = %opponent_challenge_card, ?comparison, "resolving opponent challenge");

        if comparison == Comparison::OpponentWins {
            state.return_to_deck(Side::Opponent, &[opponent_card, opponent_challenge_card]);
            state.discard(&[player_card]);
            state.close_turn();
            return TurnOutcome::new(
                Some(Side::Opponent),
                comparison,
                "The opponent's challenge succeeds! Your card is discarded.",
                Phase::Normal,
            )
            .lost(&[player_card])
            .kept(&[opponent_card, opponent_challenge_card]);
        }

        state.discard(&[opponent_card, opponent_challenge_card]);
        state.return_to_deck(Side::Player, &[player_card]);
        state.close_turn();

        let message = if comparison == Comparison::Tie {
            "The opponent's challenge ties! The opponent loses its cards."
        } else {
            "The opponent's challenge fails! You keep your card."
        };

        TurnOutcome::new(Some(Side::Player), comparison, message, Phase::Normal)
            .lost(&[opponent_card, opponent_challenge_card])
            .kept(&[player_card])
    }

    /// Resolve one battle round. Only the two selected cards are compared;
    /// the rest of each stake rides on the result.
    pub fn resolve_battle(
        &self,
        state: &mut MatchState,
        player_stake: &Stake,
        opponent_stake: &Stake,
        selected_player_card: Card,
        selected_opponent_card: Card,
    ) -> TurnOutcome {
        let comparison = self.comparator.compare(&selected_player_card, &selected_opponent_card);
        debug!(
            player = %selected_player_card,
            opponent = %selected_opponent_card,
            ?comparison,
            "resolving battle"
        );

        let player_cards: CardList = player_stake.cards().copied().collect();
        let opponent_cards: CardList = opponent_stake.cards().copied().collect();

        match comparison {
            Comparison::PlayerWins => {
                state.return_to_deck(Side::Player, &player_cards);
                state.discard(&opponent_cards);
                state.close_turn();
                TurnOutcome::new(
                    Some(Side::Player),
                    comparison,
                    "You win the battle! All opponent cards discarded.",
                    Phase::Normal,
                )
                .lost(&opponent_cards)
                .kept(&player_cards)
            }
            Comparison::OpponentWins => {
                state.return_to_deck(Side::Opponent, &opponent_cards);
                state.discard(&player_cards);
                state.close_turn();
                TurnOutcome::new(
                    Some(Side::Opponent),
                    comparison,
                    "Opponent wins the battle! All your cards discarded.",
                    Phase::Normal,
                )
                .lost(&player_cards)
                .kept(&opponent_cards)
            }
            Comparison::Tie if state.can_battle() => {
                // Same stakes, same hands: the next round picks again from them.
                state.hold_battle(
                    selected_player_card,
                    selected_opponent_card,
                    player_stake.clone(),
                    opponent_stake.clone(),
                );
                TurnOutcome::new(None, comparison, "Battle ties again! Another battle required.", Phase::Battle)
                    .kept(player_cards.iter().chain(opponent_cards.iter()))
            }
            Comparison::Tie => {
                state.discard(&player_cards);
                state.discard(&opponent_cards);
                state.finish(None);
                TurnOutcome::new(
                    None,
                    comparison,
                    "Another tie in battle, but insufficient cards for another battle. Game ends.",
                    Phase::GameOver,
                )
                .lost(player_cards.iter().chain(opponent_cards.iter()))
            }
        }
    }

    fn commit_reveal(
        &self,
        state: &mut MatchState,
        player_card: Card,
        opponent_card: Card,
        winner: Side,
        message: &str,
    ) -> TurnOutcome {
        let (kept, lost, comparison) = match winner {
            Side::Player => (player_card, opponent_card, Comparison::PlayerWins),
            Side::Opponent => (opponent_card, player_card, Comparison::OpponentWins),
        };

        state.return_to_deck(winner, &[kept]);
        state.discard(&[lost]);
        state.close_turn();

        TurnOutcome::new(Some(winner), comparison, message, Phase::Normal)
            .lost(&[lost])
            .kept(&[kept])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AlwaysChallenge, NeverChallenge};
    use crate::cards::{Deck, Rank, Suit};

    fn red(rank: Rank) -> Card {
        Card::new(Suit::Hearts, rank)
    }

    fn black(rank: Rank) -> Card {
        Card::new(Suit::Spades, rank)
    }

    /// Decks of `n` low filler cards each.
    fn state_with(n: usize) -> MatchState {
        let fill = |suit: Suit| Deck::from_cards(Rank::ALL[..n].iter().map(move |&r| Card::new(suit, r)));
        MatchState::from_decks(fill(Suit::Diamonds), fill(Suit::Clubs), &MatchConfig::default())
    }

    fn quiet() -> TurnResolver<StandardComparator, NeverChallenge> {
        TurnResolver::with_parts(StandardComparator, NeverChallenge, true)
    }

    #[test]
    fn test_player_wins_reveal() {
        let mut state = state_with(5);
        let outcome = quiet().resolve_turn(&mut state, red(Rank::King), black(Rank::Queen));

        assert_eq!(outcome.winner, Some(Side::Player));
        assert_eq!(outcome.comparison, Comparison::PlayerWins);
        assert_eq!(outcome.next_phase, Phase::Normal);
        assert!(!outcome.player_may_challenge);
        assert_eq!(state.player_deck().iter().next(), Some(&red(Rank::King)));
        assert_eq!(state.discard_pile().last(), Some(&black(Rank::Queen)));
        assert_eq!(state.phase(), Phase::Normal);
    }

    #[test]
    fn test_opponent_wins_reveal_stages_cards() {
        let mut state = state_with(5);
        let outcome = quiet().resolve_turn(&mut state, red(Rank::Seven), black(Rank::Jack));

        assert_eq!(outcome.comparison, Comparison::OpponentWins);
        assert_eq!(outcome.next_phase, Phase::Challenge);
        assert!(outcome.player_may_challenge);
        // Nothing committed until the challenge window closes
        assert!(state.discard_pile().is_empty());
        assert_eq!(state.opponent_deck().len(), 5);
        let challenge = state.active_turn().and_then(|t| t.challenge.clone()).unwrap();
        assert_eq!(challenge.challenger, Side::Player);
    }

    #[test]
    fn test_opponent_challenge_policy_consulted() {
        let mut state = state_with(5);
        let resolver = TurnResolver::with_parts(StandardComparator, AlwaysChallenge, true);
        let outcome = resolver.resolve_turn(&mut state, red(Rank::King), black(Rank::Two));

        assert_eq!(outcome.winner, None);
        assert!(outcome.opponent_is_challenging);
        assert_eq!(outcome.next_phase, Phase::Challenge);
        assert_eq!(state.phase(), Phase::Challenge);
        assert!(state.discard_pile().is_empty());
    }

    #[test]
    fn test_opponent_challenges_disabled() {
        let mut state = state_with(5);
        let resolver = TurnResolver::with_parts(StandardComparator, AlwaysChallenge, false);
        let outcome = resolver.resolve_turn(&mut state, red(Rank::King), black(Rank::Two));

        assert_eq!(outcome.next_phase, Phase::Normal);
        assert!(!outcome.opponent_is_challenging);
    }

    #[test]
    fn test_tie_enters_battle() {
        let mut state = state_with(4);
        let outcome = quiet().resolve_turn(&mut state, red(Rank::Eight), black(Rank::Eight));

        assert_eq!(outcome.comparison, Comparison::Tie);
        assert_eq!(outcome.next_phase, Phase::Battle);
        assert_eq!(state.phase(), Phase::Battle);
        assert!(state.discard_pile().is_empty());
        assert_eq!(state.player_deck().len(), 4);

        let battle = state.active_turn().and_then(|t| t.battle.clone()).unwrap();
        assert_eq!(battle.stakes[Side::Player].held.as_slice(), &[red(Rank::Eight)]);
        assert_eq!(battle.round, 1);
    }

    #[test]
    fn test_tie_short_deck_ends_match() {
        let mut state = state_with(3);
        let outcome = quiet().resolve_turn(&mut state, red(Rank::Eight), black(Rank::Eight));

        assert_eq!(outcome.next_phase, Phase::GameOver);
        assert_eq!(outcome.winner, None);
        assert_eq!(state.phase(), Phase::GameOver);
        assert_eq!(state.winner(), None);
        assert_eq!(state.discard_pile().len(), 2);
    }

    #[test]
    fn test_challenge_success() {
        let mut state = state_with(5);
        let outcome = quiet().resolve_challenge(&mut state, red(Rank::Seven), black(Rank::Jack), red(Rank::King));

        assert_eq!(outcome.winner, Some(Side::Player));
        assert_eq!(outcome.next_phase, Phase::Normal);
        assert_eq!(outcome.cards_kept.as_slice(), &[red(Rank::Seven), red(Rank::King)]);
        assert_eq!(state.player_deck().len(), 7);
        assert_eq!(state.opponent_deck().len(), 5);
        assert!(state.discard_pile().contains(&black(Rank::Jack)));
    }

    #[test]
    fn test_challenge_failure() {
        let mut state = state_with(5);
        let outcome = quiet().resolve_challenge(&mut state, red(Rank::Seven), black(Rank::Jack), red(Rank::Nine));

        assert_eq!(outcome.winner, Some(Side::Opponent));
        assert_eq!(outcome.comparison, Comparison::OpponentWins);
        assert_eq!(outcome.next_phase, Phase::Normal);
        assert_eq!(state.discard_pile().len(), 2);
        assert_eq!(state.opponent_deck().len(), 6);
    }

    #[test]
    fn test_challenge_tie_routes_to_battle() {
        let mut state = state_with(5);
        let outcome = quiet().resolve_challenge(&mut state, red(Rank::Seven), black(Rank::Jack), red(Rank::Jack));

        assert_eq!(outcome.comparison, Comparison::Tie);
        assert_eq!(outcome.next_phase, Phase::Battle);
        assert_eq!(state.phase(), Phase::Battle);
        assert_eq!(state.discard_pile().len(), 2);
        assert_eq!(state.opponent_deck().len(), 6);
        let battle = state.active_turn().and_then(|t| t.battle.clone()).unwrap();
        assert!(battle.stakes[Side::Player].is_empty());
    }

    #[test]
    fn test_opponent_challenge_tie_routes_to_normal() {
        let mut state = state_with(5);
        let outcome =
            quiet().resolve_opponent_challenge(&mut state, red(Rank::Nine), black(Rank::Four), black(Rank::Nine));

        assert_eq!(outcome.comparison, Comparison::Tie);
        assert_eq!(outcome.winner, Some(Side::Player));
        assert_eq!(outcome.next_phase, Phase::Normal);
        assert!(outcome.message.contains("ties"));
        assert_eq!(state.player_deck().len(), 6);
        assert_eq!(state.discard_pile().len(), 2);
    }

    #[test]
    fn test_opponent_challenge_success() {
        let mut state = state_with(5);
        let outcome =
            quiet().resolve_opponent_challenge(&mut state, red(Rank::Nine), black(Rank::Four), black(Rank::Ten));

        assert_eq!(outcome.winner, Some(Side::Opponent));
        assert_eq!(state.opponent_deck().len(), 7);
        assert_eq!(state.discard_pile().iter().copied().collect::<Vec<_>>(), vec![red(Rank::Nine)]);
    }

    #[test]
    fn test_declined_challenge_commits() {
        let mut state = state_with(5);
        let outcome = quiet().resolve_declined_challenge(&mut state, red(Rank::Seven), black(Rank::Jack), Side::Player);

        assert_eq!(outcome.winner, Some(Side::Opponent));
        assert_eq!(state.opponent_deck().len(), 6);
        assert!(state.discard_pile().contains(&red(Rank::Seven)));
    }

    #[test]
    fn test_battle_win_moves_four_cards() {
        let mut state = state_with(5);
        let player = Stake {
            held: [red(Rank::Eight)].into_iter().collect(),
            hand: [red(Rank::Two), red(Rank::Ace), red(Rank::Five)].into_iter().collect(),
        };
        let opponent = Stake {
            held: [black(Rank::Eight)].into_iter().collect(),
            hand: [black(Rank::King), black(Rank::Three), black(Rank::Ace)].into_iter().collect(),
        };

        let outcome = quiet().resolve_battle(&mut state, &player, &opponent, red(Rank::Two), black(Rank::Ace));

        assert_eq!(outcome.winner, Some(Side::Player));
        assert_eq!(outcome.cards_kept.len(), 4);
        assert_eq!(outcome.cards_lost.len(), 4);
        assert_eq!(state.player_deck().len(), 9);
        assert_eq!(state.discard_pile().len(), 4);
        assert_eq!(state.phase(), Phase::Normal);
    }

    #[test]
    fn test_battle_tie_holds_stakes() {
        let mut state = state_with(5);
        let player = Stake {
            held: [red(Rank::Eight)].into_iter().collect(),
            hand: [red(Rank::Six), red(Rank::Ace), red(Rank::Five)].into_iter().collect(),
        };
        let opponent = Stake {
            held: [black(Rank::Eight)].into_iter().collect(),
            hand: [black(Rank::Six), black(Rank::Three), black(Rank::Ace)].into_iter().collect(),
        };

        let outcome = quiet().resolve_battle(&mut state, &player, &opponent, red(Rank::Six), black(Rank::Six));

        assert_eq!(outcome.next_phase, Phase::Battle);
        assert_eq!(outcome.cards_kept.len(), 8);
        assert!(state.discard_pile().is_empty());
        let battle = state.active_turn().and_then(|t| t.battle.clone()).unwrap();
        assert_eq!(battle.stakes[Side::Opponent], opponent);
        assert_eq!(battle.selected[Side::Player], None);
    }
}
