//! Match state.
//!
//! ## MatchState
//!
//! Everything a match owns:
//! - Both decks and the discard pile
//! - Turn counter, phase, winner and last result message
//! - The active turn record holding staged cards
//! - The match RNG
//!
//! Cards staged in the active turn are in neither a deck nor the discard
//! pile. They are committed exactly once, when the challenge or battle that
//! holds them resolves.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{info, warn};

use super::config::MatchConfig;
use super::error::{EngineError, EngineResult};
use super::rng::{GameRng, GameRngState};
use super::side::{Side, SideMap};
use crate::cards::{Card, Deck, DiscardPile};

/// Match phase. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    Normal,
    Challenge,
    Battle,
    GameOver,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::Normal => "normal",
            Phase::Challenge => "challenge",
            Phase::Battle => "battle",
            Phase::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// A challenge waiting to be answered or resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingChallenge {
    /// The side that lost the reveal and may contest it.
    pub challenger: Side,
    /// The drawn challenge card, once the challenger has committed to it.
    pub card: Option<Card>,
}

/// One side's cards at risk in a battle round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    /// Cards carried in from earlier in the turn (normally the revealed card).
    pub held: SmallVec<[Card; 4]>,
    /// The face-down battle hand the deciding card is picked from.
    pub hand: SmallVec<[Card; 3]>,
}

impl Stake {
    #[must_use]
    pub fn holding(card: Card) -> Self {
        Self {
            held: SmallVec::from_slice(&[card]),
            hand: SmallVec::new(),
        }
    }

    /// Every card in the stake, held cards first.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.held.iter().chain(self.hand.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len() + self.hand.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Battle staging for the active turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStaging {
    pub stakes: SideMap<Stake>,
    pub selected: SideMap<Option<Card>>,
    /// 1 for the first round, incremented on every tied round.
    pub round: u32,
}

impl BattleStaging {
    /// Whether the battle hands have been dealt.
    #[must_use]
    pub fn hands_dealt(&self) -> bool {
        Side::BOTH.iter().any(|&s| !self.stakes[s].hand.is_empty())
    }
}

/// The in-flight turn record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTurn {
    pub player_card: Card,
    pub opponent_card: Card,
    pub phase: Phase,
    pub challenge: Option<PendingChallenge>,
    pub battle: Option<BattleStaging>,
}

impl ActiveTurn {
    #[must_use]
    pub fn new(player_card: Card, opponent_card: Card) -> Self {
        Self {
            player_card,
            opponent_card,
            phase: Phase::Normal,
            challenge: None,
            battle: None,
        }
    }

    /// Cards currently staged by this turn, in neither a deck nor the discard pile.
    #[must_use]
    pub fn staged_cards(&self) -> Vec<Card> {
        match &self.battle {
            Some(battle) => Side::BOTH
                .iter()
                .flat_map(|&s| battle.stakes[s].cards().copied())
                .collect(),
            None => {
                let mut cards = vec![self.player_card, self.opponent_card];
                if let Some(card) = self.challenge.as_ref().and_then(|c| c.card) {
                    cards.push(card);
                }
                cards
            }
        }
    }
}

/// Public counters for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub turn_number: u32,
    pub player_card_count: usize,
    pub opponent_card_count: usize,
    pub discarded_card_count: usize,
}

/// Full state of one match.
#[derive(Clone, Debug)]
pub struct MatchState {
    decks: SideMap<Deck>,
    discard_pile: DiscardPile,
    turn_number: u32,
    phase: Phase,
    active_turn: Option<ActiveTurn>,
    winner: Option<Side>,
    last_result: Option<String>,
    config: MatchConfig,
    rng: GameRng,
}

impl MatchState {
    /// Set up a match: red deck for the player, black for the opponent,
    /// both shuffled unless the config disables it.
    #[must_use]
    pub fn new(config: &MatchConfig) -> Self {
        let mut state = Self::with_decks(Deck::red(), Deck::black(), config);

        if config.shuffle_decks {
            for side in Side::BOTH {
                state.decks[side].shuffle(&mut state.rng);
            }
        }

        state.phase = Phase::Normal;
        info!(seed = config.seed, "match initialized");
        state
    }

    /// Set up a match from explicit decks, listed bottom to top. No shuffle.
    #[must_use]
    pub fn from_decks(player_deck: Deck, opponent_deck: Deck, config: &MatchConfig) -> Self {
        let mut state = Self::with_decks(player_deck, opponent_deck, config);
        state.phase = Phase::Normal;
        state
    }

    fn with_decks(player_deck: Deck, opponent_deck: Deck, config: &MatchConfig) -> Self {
        Self {
            decks: SideMap::new(player_deck, opponent_deck),
            discard_pile: DiscardPile::new(),
            turn_number: 0,
            phase: Phase::Setup,
            active_turn: None,
            winner: None,
            last_result: None,
            config: config.clone(),
            rng: GameRng::new(config.seed),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    #[must_use]
    pub fn deck(&self, side: Side) -> &Deck {
        &self.decks[side]
    }

    #[must_use]
    pub fn player_deck(&self) -> &Deck {
        &self.decks[Side::Player]
    }

    #[must_use]
    pub fn opponent_deck(&self) -> &Deck {
        &self.decks[Side::Opponent]
    }

    #[must_use]
    pub fn discard_pile(&self) -> &DiscardPile {
        &self.discard_pile
    }

    #[must_use]
    pub fn active_turn(&self) -> Option<&ActiveTurn> {
        self.active_turn.as_ref()
    }

    #[must_use]
    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// The config this match was set up with.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Cards each deck needs for a battle round.
    #[must_use]
    pub fn battle_minimum(&self) -> usize {
        self.config.battle_minimum()
    }

    /// Both decks can stake a battle round.
    #[must_use]
    pub fn can_battle(&self) -> bool {
        Side::BOTH.iter().all(|&s| self.decks[s].has_at_least(self.battle_minimum()))
    }

    #[must_use]
    pub fn stats(&self) -> MatchStats {
        MatchStats {
            turn_number: self.turn_number,
            player_card_count: self.decks[Side::Player].len(),
            opponent_card_count: self.decks[Side::Opponent].len(),
            discarded_card_count: self.discard_pile.len(),
        }
    }

    /// Cards in both decks, the discard pile and the active turn.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        let staged = self.active_turn.as_ref().map_or(0, |t| t.staged_cards().len());
        self.decks[Side::Player].len() + self.decks[Side::Opponent].len() + self.discard_pile.len() + staged
    }

    // === Turn flow ===

    /// Draw the reveal pair for a new Normal turn.
    ///
    /// Returns `Ok(None)` and ends the match if either deck is empty.
    pub fn start_turn(&mut self) -> EngineResult<Option<(Card, Card)>> {
        if self.phase != Phase::Normal {
            return Err(EngineError::invalid_phase("start a turn", self.phase));
        }

        if self.decks.iter().any(|(_, deck)| deck.is_empty()) {
            self.end_by_card_count();
            return Ok(None);
        }

        let (Some(player_card), Some(opponent_card)) = (
            self.decks[Side::Player].draw(),
            self.decks[Side::Opponent].draw(),
        ) else {
            self.end_by_card_count();
            return Ok(None);
        };

        self.turn_number += 1;
        self.active_turn = Some(ActiveTurn::new(player_card, opponent_card));
        Ok(Some((player_card, opponent_card)))
    }

    /// End-of-match check for callers that need it between actions.
    ///
    /// Ends the match when a side is out of cards at a Normal boundary, or
    /// when a battle sits undealt without enough cards to deal it.
    pub fn check_end_conditions(&mut self) -> bool {
        match self.phase {
            Phase::GameOver => true,
            Phase::Normal if self.decks.iter().any(|(_, d)| d.is_empty()) => {
                self.end_by_card_count();
                true
            }
            Phase::Battle => {
                let undealt = self
                    .active_turn
                    .as_ref()
                    .and_then(|t| t.battle.as_ref())
                    .map_or(true, |b| !b.hands_dealt());
                if undealt && !self.can_battle() {
                    warn!("battle pending without enough cards; ending match");
                    self.abandon_turn();
                    self.end_by_card_count();
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    // === Mutation used by the resolver and controller ===

    pub(crate) fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    pub(crate) fn deck_mut(&mut self, side: Side) -> &mut Deck {
        &mut self.decks[side]
    }

    pub(crate) fn return_to_deck(&mut self, side: Side, cards: &[Card]) {
        self.decks[side].add_cards(cards);
    }

    pub(crate) fn discard(&mut self, cards: &[Card]) {
        self.discard_pile.extend(cards);
    }

    pub(crate) fn set_last_result(&mut self, message: &str) {
        self.last_result = Some(message.to_string());
    }

    fn turn_for(&mut self, player_card: Card, opponent_card: Card) -> &mut ActiveTurn {
        self.active_turn
            .get_or_insert_with(|| ActiveTurn::new(player_card, opponent_card))
    }

    /// Hold the reveal pair while `challenger` decides.
    pub(crate) fn stage_challenge(&mut self, player_card: Card, opponent_card: Card, challenger: Side) {
        let turn = self.turn_for(player_card, opponent_card);
        turn.phase = Phase::Challenge;
        turn.challenge = Some(PendingChallenge { challenger, card: None });
        self.phase = Phase::Challenge;
    }

    /// Record the challenger's drawn card.
    pub(crate) fn stage_challenge_card(&mut self, card: Card) {
        if let Some(challenge) = self.active_turn.as_mut().and_then(|t| t.challenge.as_mut()) {
            challenge.card = Some(card);
        }
    }

    /// Hold both stakes for a battle round. Hands are kept as given; an empty
    /// hand means the controller still has to deal.
    pub(crate) fn hold_battle(
        &mut self,
        player_card: Card,
        opponent_card: Card,
        player: Stake,
        opponent: Stake,
    ) {
        let turn = self.turn_for(player_card, opponent_card);
        let round = turn.battle.as_ref().map_or(1, |b| b.round + 1);
        turn.phase = Phase::Battle;
        turn.challenge = None;
        turn.battle = Some(BattleStaging {
            stakes: SideMap::new(player, opponent),
            selected: SideMap::default(),
            round,
        });
        self.phase = Phase::Battle;
    }

    pub(crate) fn battle_mut(&mut self) -> Option<&mut BattleStaging> {
        self.active_turn.as_mut().and_then(|t| t.battle.as_mut())
    }

    /// The turn has fully resolved.
    pub(crate) fn close_turn(&mut self) {
        self.active_turn = None;
        self.phase = Phase::Normal;
    }

    /// Discard everything the active turn still stages.
    pub(crate) fn abandon_turn(&mut self) {
        if let Some(turn) = self.active_turn.take() {
            self.discard_pile.extend(&turn.staged_cards());
        }
    }

    /// End the match with an explicit result.
    pub(crate) fn finish(&mut self, winner: Option<Side>) {
        self.phase = Phase::GameOver;
        self.winner = winner;
        self.active_turn = None;
        info!(
            winner = ?winner,
            turns = self.turn_number,
            player_cards = self.decks[Side::Player].len(),
            opponent_cards = self.decks[Side::Opponent].len(),
            "match over"
        );
    }

    /// End the match, awarding it to whoever holds more cards.
    pub(crate) fn end_by_card_count(&mut self) {
        let player = self.decks[Side::Player].len();
        let opponent = self.decks[Side::Opponent].len();
        let winner = match player.cmp(&opponent) {
            std::cmp::Ordering::Greater => Some(Side::Player),
            std::cmp::Ordering::Less => Some(Side::Opponent),
            std::cmp::Ordering::Equal => None,
        };
        self.finish(winner);
    }

    /// Empty every container and return to Setup.
    pub fn reset(&mut self) {
        for (_, deck) in self.decks.iter_mut() {
            deck.reset();
        }
        self.discard_pile.clear();
        self.turn_number = 0;
        self.phase = Phase::Setup;
        self.active_turn = None;
        self.winner = None;
        self.last_result = None;
    }

    // === Checkpoints ===

    /// Encode the full match, including its config and RNG position.
    pub fn save(&self) -> EngineResult<Vec<u8>> {
        let checkpoint = Checkpoint {
            decks: self.decks.clone(),
            discard_pile: self.discard_pile.clone(),
            turn_number: self.turn_number,
            phase: self.phase,
            active_turn: self.active_turn.clone(),
            winner: self.winner,
            last_result: self.last_result.clone(),
            config: self.config.clone(),
            rng: self.rng.state(),
        };
        Ok(bincode::serialize(&checkpoint)?)
    }

    /// Restore a match encoded by [`MatchState::save`].
    pub fn restore(bytes: &[u8]) -> EngineResult<Self> {
        let checkpoint: Checkpoint = bincode::deserialize(bytes)?;
        checkpoint.config.validate()?;
        Ok(Self {
            decks: checkpoint.decks,
            discard_pile: checkpoint.discard_pile,
            turn_number: checkpoint.turn_number,
            phase: checkpoint.phase,
            active_turn: checkpoint.active_turn,
            winner: checkpoint.winner,
            last_result: checkpoint.last_result,
            config: checkpoint.config,
            rng: GameRng::from_state(&checkpoint.rng),
        })
    }
}

#[derive(Serialize, Deserialize)]
struct Checkpoint {
    decks: SideMap<Deck>,
    discard_pile: DiscardPile,
    turn_number: u32,
    phase: Phase,
    active_turn: Option<ActiveTurn>,
    winner: Option<Side>,
    last_result: Option<String>,
    config: MatchConfig,
    rng: GameRngState,
}
