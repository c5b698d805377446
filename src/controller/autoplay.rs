//! Automated full matches.
//!
//! `AutoPlayer` drives a [`MatchController`] from the player's seat with a
//! pluggable [`PlayerStrategy`] and keeps a running tally across matches.
//! Used for soak testing, balance checks and the benchmark.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::match_controller::{ChallengeResponse, MatchController};
use super::snapshot::MatchSnapshot;
use crate::cards::Card;
use crate::core::{EngineError, EngineResult, GameRng, MatchConfig, Phase, Side};

/// The player's two decisions.
pub trait PlayerStrategy {
    /// Whether to contest a lost reveal.
    fn accept_challenge(&mut self, snapshot: &MatchSnapshot, rng: &mut GameRng) -> bool;

    /// The deciding card from the player's battle hand.
    fn pick_battle_card(&mut self, hand: &[Card], rng: &mut GameRng) -> Option<Card>;
}

/// Challenges at a fixed rate and picks battle cards uniformly.
#[derive(Clone, Debug)]
pub struct RandomStrategy {
    pub challenge_rate: f64,
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self { challenge_rate: 0.5 }
    }
}

impl PlayerStrategy for RandomStrategy {
    fn accept_challenge(&mut self, _snapshot: &MatchSnapshot, rng: &mut GameRng) -> bool {
        rng.gen_unit() < self.challenge_rate
    }

    fn pick_battle_card(&mut self, hand: &[Card], rng: &mut GameRng) -> Option<Card> {
        rng.choose(hand).copied()
    }
}

/// Always challenges and always plays its strongest battle card.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyStrategy;

impl PlayerStrategy for GreedyStrategy {
    fn accept_challenge(&mut self, _snapshot: &MatchSnapshot, _rng: &mut GameRng) -> bool {
        true
    }

    fn pick_battle_card(&mut self, hand: &[Card], _rng: &mut GameRng) -> Option<Card> {
        hand.iter().copied().max_by_key(Card::value)
    }
}

/// Summary of one automated match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub seed: u64,
    pub winner: Option<Side>,
    pub turns: u32,
    /// Controller calls made.
    pub steps: usize,
    pub player_cards: usize,
    pub opponent_cards: usize,
    pub discarded: usize,
    /// Hit the step limit before the match ended.
    pub truncated: bool,
}

/// Running results across matches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTally {
    pub played: u32,
    pub won: u32,
    pub lost: u32,
    pub drawn: u32,
    pub total_turns: u64,
}

impl MatchTally {
    pub fn record(&mut self, report: &MatchReport) {
        self.played += 1;
        self.total_turns += u64::from(report.turns);
        match report.winner {
            Some(Side::Player) => self.won += 1,
            Some(Side::Opponent) => self.lost += 1,
            None => self.drawn += 1,
        }
    }

    #[must_use]
    pub fn average_turns(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            self.total_turns as f64 / f64::from(self.played)
        }
    }

    /// Fraction of played matches the player won.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            f64::from(self.won) / f64::from(self.played)
        }
    }
}

/// Plays whole matches from the player's seat.
pub struct AutoPlayer<S = RandomStrategy> {
    config: MatchConfig,
    strategy: S,
    rng: GameRng,
    max_steps: usize,
    tally: MatchTally,
}

impl AutoPlayer {
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self::with_strategy(config, RandomStrategy::default())
    }
}

impl<S: PlayerStrategy> AutoPlayer<S> {
    pub fn with_strategy(config: MatchConfig, strategy: S) -> Self {
        let rng = GameRng::new(config.seed).for_context("autoplay");
        Self {
            config,
            strategy,
            rng,
            max_steps: 10_000,
            tally: MatchTally::default(),
        }
    }

    /// Cap on controller calls per match.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub fn tally(&self) -> &MatchTally {
        &self.tally
    }

    /// Play one match to the end and add it to the tally.
    pub fn play_match(&mut self, config: &MatchConfig) -> EngineResult<MatchReport> {
        let mut controller = MatchController::new(config.clone())?;
        let mut steps = 0;

        while steps < self.max_steps && !controller.state().is_over() {
            steps += 1;
            self.step(&mut controller)?;
        }

        let state = controller.state();
        let truncated = !state.is_over();
        if truncated {
            warn!(seed = config.seed, steps, "match truncated at step limit");
        }

        let report = MatchReport {
            seed: config.seed,
            winner: state.winner(),
            turns: state.turn_number(),
            steps,
            player_cards: state.player_deck().len(),
            opponent_cards: state.opponent_deck().len(),
            discarded: state.discard_pile().len(),
            truncated,
        };
        debug!(winner = ?report.winner, turns = report.turns, "autoplay match finished");

        self.tally.record(&report);
        Ok(report)
    }

    /// Play `count` matches with seeds forked from the configured seed.
    pub fn play_series(&mut self, count: usize) -> EngineResult<MatchTally> {
        let mut seeds = GameRng::new(self.config.seed);
        for _ in 0..count {
            let config = self.config.clone().with_seed(seeds.fork().seed());
            self.play_match(&config)?;
        }
        Ok(self.tally.clone())
    }

    fn step(&mut self, controller: &mut MatchController) -> EngineResult<()> {
        match controller.state().phase() {
            Phase::Normal => {
                controller.reveal_turn()?;
            }
            Phase::Challenge if controller.challenge_offered() => {
                let snapshot = controller.current_state();
                let accept = self.strategy.accept_challenge(&snapshot, &mut self.rng);
                if let ChallengeResponse::Accepted { .. } = controller.respond_to_challenge(accept)? {
                    controller.submit_challenge_card()?;
                }
            }
            Phase::Challenge => {
                controller.submit_challenge_card()?;
            }
            Phase::Battle => {
                let card = self
                    .strategy
                    .pick_battle_card(controller.battle_hand(Side::Player), &mut self.rng)
                    .ok_or(EngineError::BattleNotReady)?;
                controller.select_battle_card(card)?;
            }
            Phase::Setup | Phase::GameOver => {
                controller.check_end_conditions();
            }
        }
        Ok(())
    }
}
