//! Opponent battle pick.

use crate::cards::Card;
use crate::core::GameRng;

/// The opponent picks its deciding battle card uniformly at random.
///
/// Returns `None` only for an empty hand.
pub fn choose_battle_card(hand: &[Card], rng: &mut GameRng) -> Option<Card> {
    rng.choose(hand).copied()
}
