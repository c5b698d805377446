//! Match orchestration.
//!
//! `MatchController` is the surface a host drives. It owns the match state,
//! hands every rules decision to the [`TurnResolver`], deals battle hands,
//! and keeps the flags a UI needs (`message`, `player_may_act`,
//! `challenge_offered`, the battle sub-phase).
//!
//! ## Phase gates
//!
//! | Call                    | Allowed in |
//! |-------------------------|------------|
//! | `reveal_turn`           | Normal     |
//! | `respond_to_challenge`  | Challenge, when offered to the player |
//! | `submit_challenge_card` | Challenge  |
//! | `select_battle_card`    | Battle, once hands are dealt |
//!
//! A call outside its phase returns [`EngineError::InvalidPhase`] and leaves
//! the match untouched.

use tracing::{debug, info, warn};

use super::observer::MatchObserver;
use super::snapshot::{BattleSubPhase, MatchSnapshot, TurnView};
use crate::ai::{choose_battle_card, ChallengePolicy, ChallengeTable};
use crate::cards::Card;
use crate::core::{
    BattleStaging, EngineError, EngineResult, MatchConfig, MatchState, Phase, Side,
};
use crate::rules::{CardComparator, StandardComparator, TurnOutcome, TurnResolver};

const OPENING_MESSAGE: &str = "Reveal a card to begin!";
const BATTLE_MESSAGE: &str = "Battle! Select one of your face-down battle cards.";
const CHALLENGE_DRAWN_MESSAGE: &str = "Challenge accepted! Submit your challenge card.";
const NO_BATTLE_MESSAGE: &str = "Battle cannot be conducted - insufficient cards. Game ends.";

/// The player's answer to a challenge offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChallengeResponse {
    /// A challenge card was drawn and staged; call `submit_challenge_card`.
    Accepted { challenge_card: Card },
    /// The loss was committed (declined, or no card left to challenge with).
    Declined(TurnOutcome),
}

/// Drives one match at a time.
pub struct MatchController<C = StandardComparator, P = ChallengeTable> {
    config: MatchConfig,
    state: MatchState,
    resolver: TurnResolver<C, P>,
    message: String,
    player_may_act: bool,
    challenge_offered: bool,
    battle_sub_phase: BattleSubPhase,
    observers: Vec<Box<dyn MatchObserver + Send>>,
}

impl MatchController {
    /// A shuffled match ready for its first reveal.
    pub fn new(config: MatchConfig) -> EngineResult<Self> {
        config.validate()?;
        let state = MatchState::new(&config);
        let resolver = TurnResolver::new(&config);
        Ok(Self::with_parts(config, state, resolver))
    }

    /// Resume a match from a [`MatchState::save`] checkpoint, under the
    /// config it was saved with.
    pub fn resume(checkpoint: &[u8]) -> EngineResult<Self> {
        let state = MatchState::restore(checkpoint)?;
        let config = state.config().clone();
        let resolver = TurnResolver::new(&config);
        let mut controller = Self::with_parts(config, state, resolver);
        controller.sync_flags();
        Ok(controller)
    }
}

impl<C: CardComparator, P: ChallengePolicy> MatchController<C, P> {
    /// Build from an existing state and resolver, e.g. scripted decks.
    pub fn with_parts(config: MatchConfig, state: MatchState, resolver: TurnResolver<C, P>) -> Self {
        let player_may_act = state.phase() == Phase::Normal;
        Self {
            config,
            state,
            resolver,
            message: OPENING_MESSAGE.to_string(),
            player_may_act,
            challenge_offered: false,
            battle_sub_phase: BattleSubPhase::Setup,
            observers: Vec::new(),
        }
    }

    /// Register an observer notified after every state change.
    pub fn subscribe(&mut self, observer: impl MatchObserver + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn player_may_act(&self) -> bool {
        self.player_may_act
    }

    #[must_use]
    pub fn challenge_offered(&self) -> bool {
        self.challenge_offered
    }

    #[must_use]
    pub fn battle_sub_phase(&self) -> BattleSubPhase {
        self.battle_sub_phase
    }

    /// A side's dealt battle hand; empty outside a battle.
    #[must_use]
    pub fn battle_hand(&self, side: Side) -> &[Card] {
        self.state
            .active_turn()
            .and_then(|t| t.battle.as_ref())
            .map(|b| b.stakes[side].hand.as_slice())
            .unwrap_or_default()
    }

    /// Read-only view of the whole match.
    #[must_use]
    pub fn current_state(&self) -> MatchSnapshot {
        MatchSnapshot {
            phase: self.state.phase(),
            stats: self.state.stats(),
            winner: self.state.winner(),
            last_result: self.state.last_result().map(str::to_owned),
            message: self.message.clone(),
            player_may_act: self.player_may_act,
            challenge_offered: self.challenge_offered,
            battle_sub_phase: self.battle_sub_phase,
            turn: self.state.active_turn().map(TurnView::from_turn),
        }
    }

    // === Actions ===

    /// Start a fresh match. The seed is forked from the finished match's RNG,
    /// so a sequence of matches is reproducible from the first seed.
    pub fn new_match(&mut self) {
        let seed = self.state.rng_mut().fork().seed();
        self.new_match_with_seed(seed);
    }

    pub fn new_match_with_seed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.state = MatchState::new(&self.config);
        self.message = OPENING_MESSAGE.to_string();
        self.player_may_act = true;
        self.challenge_offered = false;
        self.battle_sub_phase = BattleSubPhase::Setup;
        info!(seed, "new match");
        self.notify();
    }

    /// Reveal the top card of each deck and resolve the comparison.
    pub fn reveal_turn(&mut self) -> EngineResult<TurnOutcome> {
        let phase = self.state.phase();
        if phase != Phase::Normal {
            return Err(EngineError::invalid_phase("reveal a card", phase));
        }

        let outcome = match self.state.start_turn()? {
            Some((player_card, opponent_card)) => {
                debug!(turn = self.state.turn_number(), "reveal");
                self.resolver.resolve_turn(&mut self.state, player_card, opponent_card)
            }
            None => TurnOutcome::match_over(self.state.winner(), game_over_message(self.state.winner())),
        };

        Ok(self.apply_outcome(outcome))
    }

    /// Accept or decline the challenge offered after losing a reveal.
    ///
    /// Accepting draws and stages the challenge card; declining commits the
    /// loss at once.
    pub fn respond_to_challenge(&mut self, accept: bool) -> EngineResult<ChallengeResponse> {
        let phase = self.state.phase();
        if phase != Phase::Challenge {
            return Err(EngineError::invalid_phase("answer a challenge", phase));
        }
        if !self.challenge_offered {
            return Err(EngineError::ChallengeNotOffered);
        }
        let turn = self.state.active_turn().ok_or(EngineError::NoActiveTurn)?;
        let (player_card, opponent_card) = (turn.player_card, turn.opponent_card);

        self.challenge_offered = false;

        if !accept {
            let outcome =
                self.resolver
                    .resolve_declined_challenge(&mut self.state, player_card, opponent_card, Side::Player);
            return Ok(ChallengeResponse::Declined(self.apply_outcome(outcome)));
        }

        match self.state.deck_mut(Side::Player).draw() {
            Some(challenge_card) => {
                debug!(card = %challenge_card, "player challenge card drawn");
                self.state.stage_challenge_card(challenge_card);
                self.message = CHALLENGE_DRAWN_MESSAGE.to_string();
                self.notify();
                Ok(ChallengeResponse::Accepted { challenge_card })
            }
            None => {
                warn!("player deck empty; challenge cannot be drawn");
                let mut outcome =
                    self.resolver
                        .resolve_declined_challenge(&mut self.state, player_card, opponent_card, Side::Player);
                outcome.message = "Cannot draw a card for the challenge. Your card is discarded.".to_string();
                Ok(ChallengeResponse::Declined(self.apply_outcome(outcome)))
            }
        }
    }

    /// Resolve the pending challenge.
    ///
    /// For a player challenge this compares the staged challenge card. When
    /// the opponent is challenging, its challenge card is drawn here.
    pub fn submit_challenge_card(&mut self) -> EngineResult<TurnOutcome> {
        let phase = self.state.phase();
        if phase != Phase::Challenge {
            return Err(EngineError::invalid_phase("submit a challenge card", phase));
        }
        let turn = self.state.active_turn().ok_or(EngineError::NoActiveTurn)?;
        let challenge = turn.challenge.clone().ok_or(EngineError::NoActiveTurn)?;
        let (player_card, opponent_card) = (turn.player_card, turn.opponent_card);

        let outcome = match challenge.challenger {
            Side::Player => {
                let challenge_card = challenge.card.ok_or(EngineError::NoChallengeCard)?;
                self.resolver
                    .resolve_challenge(&mut self.state, player_card, opponent_card, challenge_card)
            }
            Side::Opponent => {
                let drawn = challenge
                    .card
                    .or_else(|| self.state.deck_mut(Side::Opponent).draw());
                match drawn {
                    Some(challenge_card) => {
                        self.state.stage_challenge_card(challenge_card);
                        self.resolver.resolve_opponent_challenge(
                            &mut self.state,
                            player_card,
                            opponent_card,
                            challenge_card,
                        )
                    }
                    None => {
                        warn!("opponent deck empty; opponent challenge withdrawn");
                        self.resolver.resolve_declined_challenge(
                            &mut self.state,
                            player_card,
                            opponent_card,
                            Side::Opponent,
                        )
                    }
                }
            }
        };

        Ok(self.apply_outcome(outcome))
    }

    /// Pick the player's deciding battle card. The opponent picks uniformly
    /// from its own hand.
    pub fn select_battle_card(&mut self, card: Card) -> EngineResult<TurnOutcome> {
        let phase = self.state.phase();
        if phase != Phase::Battle {
            return Err(EngineError::invalid_phase("select a battle card", phase));
        }
        if self.battle_sub_phase != BattleSubPhase::Selection {
            return Err(EngineError::BattleNotReady);
        }
        let battle = self
            .state
            .active_turn()
            .and_then(|t| t.battle.clone())
            .ok_or(EngineError::NoActiveTurn)?;

        if !battle.stakes[Side::Player].hand.contains(&card) {
            return Err(EngineError::NotInBattleHand(card));
        }
        let opponent_card = choose_battle_card(&battle.stakes[Side::Opponent].hand, self.state.rng_mut())
            .ok_or(EngineError::BattleNotReady)?;

        if let Some(staging) = self.state.battle_mut() {
            staging.selected[Side::Player] = Some(card);
            staging.selected[Side::Opponent] = Some(opponent_card);
        }
        self.battle_sub_phase = BattleSubPhase::Resolution;

        let outcome = self.resolver.resolve_battle(
            &mut self.state,
            &battle.stakes[Side::Player],
            &battle.stakes[Side::Opponent],
            card,
            opponent_card,
        );
        Ok(self.apply_outcome(outcome))
    }

    /// Run the end-of-match check between actions. Returns whether the match
    /// is over.
    pub fn check_end_conditions(&mut self) -> bool {
        let was_over = self.state.is_over();
        let over = self.state.check_end_conditions();

        if over && !was_over {
            self.message = game_over_message(self.state.winner()).to_string();
            self.state.set_last_result(&self.message);
            self.clear_flags();
            self.notify();
        }
        over
    }

    // === Internals ===

    fn apply_outcome(&mut self, mut outcome: TurnOutcome) -> TurnOutcome {
        self.message = outcome.message.clone();

        if self.state.phase() == Phase::Battle {
            let dealt = self
                .state
                .active_turn()
                .and_then(|t| t.battle.as_ref())
                .is_some_and(BattleStaging::hands_dealt);

            if dealt {
                self.battle_sub_phase = BattleSubPhase::Selection;
                self.message = BATTLE_MESSAGE.to_string();
            } else if !self.deal_battle_hands() {
                outcome.next_phase = Phase::GameOver;
                outcome.winner = self.state.winner();
                outcome.message = NO_BATTLE_MESSAGE.to_string();
                self.message = outcome.message.clone();
            }
        }
        self.state.set_last_result(&outcome.message);

        match self.state.phase() {
            Phase::Normal => {
                self.player_may_act = true;
                self.challenge_offered = false;
                self.battle_sub_phase = BattleSubPhase::Setup;
            }
            Phase::Challenge => {
                self.player_may_act = false;
                self.challenge_offered = outcome.player_may_challenge;
                self.battle_sub_phase = BattleSubPhase::Setup;
            }
            Phase::Battle => {
                self.player_may_act = false;
                self.challenge_offered = false;
            }
            Phase::GameOver | Phase::Setup => self.clear_flags(),
        }

        self.notify();
        outcome
    }

    /// Deal each side its battle hand. Returns `false` if the match ended
    /// instead.
    fn deal_battle_hands(&mut self) -> bool {
        self.battle_sub_phase = BattleSubPhase::Setup;

        if self.state.check_end_conditions() {
            return false;
        }
        if self.state.battle_mut().is_none() {
            warn!("battle phase without battle staging");
            return false;
        }

        let size = self.state.config().battle_hand_size;
        let player_hand = self.state.deck_mut(Side::Player).draw_multiple(size);
        let opponent_hand = self.state.deck_mut(Side::Opponent).draw_multiple(size);
        let empty_hand = player_hand.is_empty() || opponent_hand.is_empty();
        if player_hand.len() < size || opponent_hand.len() < size {
            warn!(
                player = player_hand.len(),
                opponent = opponent_hand.len(),
                "short battle hand dealt"
            );
        }

        if let Some(staging) = self.state.battle_mut() {
            debug!(round = staging.round, "battle hands dealt");
            staging.stakes[Side::Player].hand = player_hand.into_iter().collect();
            staging.stakes[Side::Opponent].hand = opponent_hand.into_iter().collect();
        }

        // Nothing to pick from: the battle cannot be fought
        if empty_hand {
            warn!("empty battle hand; ending match");
            self.state.abandon_turn();
            self.state.end_by_card_count();
            return false;
        }

        self.battle_sub_phase = BattleSubPhase::Selection;
        self.message = BATTLE_MESSAGE.to_string();
        true
    }

    /// Rebuild UI flags from the state alone, after a restore.
    fn sync_flags(&mut self) {
        let turn = self.state.active_turn();
        self.challenge_offered = turn
            .and_then(|t| t.challenge.as_ref())
            .is_some_and(|c| c.challenger == Side::Player && c.card.is_none());
        let dealt = turn
            .and_then(|t| t.battle.as_ref())
            .is_some_and(BattleStaging::hands_dealt);

        self.player_may_act = self.state.phase() == Phase::Normal;
        self.message = self.state.last_result().unwrap_or(OPENING_MESSAGE).to_string();
        self.battle_sub_phase = if dealt {
            BattleSubPhase::Selection
        } else {
            BattleSubPhase::Setup
        };

        if self.state.phase() == Phase::Battle && !dealt && !self.deal_battle_hands() {
            self.clear_flags();
        }
    }

    fn clear_flags(&mut self) {
        self.player_may_act = false;
        self.challenge_offered = false;
        self.battle_sub_phase = BattleSubPhase::Setup;
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.current_state();
        for observer in &mut self.observers {
            observer.on_change(&snapshot);
        }
    }
}

fn game_over_message(winner: Option<Side>) -> &'static str {
    match winner {
        Some(Side::Player) => "Game over! You win with more cards.",
        Some(Side::Opponent) => "Game over! The opponent wins with more cards.",
        None => "Game over! Both sides hold the same number of cards.",
    }
}
