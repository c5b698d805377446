//! Read-only match views for hosts and observers.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{ActiveTurn, MatchStats, Phase, Side};

/// Where the controller is inside a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleSubPhase {
    /// No battle, or hands not dealt yet.
    #[default]
    Setup,
    /// Hands are dealt; waiting for the player's pick.
    Selection,
    /// Picks are in and being compared.
    Resolution,
}

/// Public part of the in-flight turn.
///
/// The player's own battle hand is visible; the opponent's is only counted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnView {
    pub player_card: Card,
    pub opponent_card: Card,
    pub challenger: Option<Side>,
    pub challenge_card: Option<Card>,
    pub player_battle_hand: Vec<Card>,
    pub opponent_battle_hand_size: usize,
    pub battle_round: Option<u32>,
}

impl TurnView {
    pub(crate) fn from_turn(turn: &ActiveTurn) -> Self {
        let challenge = turn.challenge.as_ref();
        let battle = turn.battle.as_ref();

        Self {
            player_card: turn.player_card,
            opponent_card: turn.opponent_card,
            challenger: challenge.map(|c| c.challenger),
            challenge_card: challenge.and_then(|c| c.card),
            player_battle_hand: battle.map_or_else(Vec::new, |b| b.stakes[Side::Player].hand.to_vec()),
            opponent_battle_hand_size: battle.map_or(0, |b| b.stakes[Side::Opponent].hand.len()),
            battle_round: battle.map(|b| b.round),
        }
    }
}

/// Everything a host needs to render the match. Never includes deck order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub phase: Phase,
    pub stats: MatchStats,
    pub winner: Option<Side>,
    pub last_result: Option<String>,
    pub message: String,
    pub player_may_act: bool,
    pub challenge_offered: bool,
    pub battle_sub_phase: BattleSubPhase,
    pub turn: Option<TurnView>,
}
