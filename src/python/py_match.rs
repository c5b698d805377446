//! Match controller bindings for Python.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::controller::{ChallengeResponse, MatchController};
use crate::core::{EngineError, MatchConfig, Side};

use super::py_cards::{side_name, PyCard, PyTurnOutcome};

fn to_py_err(err: EngineError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Python wrapper for MatchController.
#[pyclass(name = "Match")]
pub struct PyMatch {
    controller: MatchController,
}

#[pymethods]
impl PyMatch {
    /// Create a shuffled match.
    ///
    /// # Arguments
    /// - seed: RNG seed for deterministic matches
    /// - opponent_challenges: whether the opponent may contest a lost reveal
    /// - battle_hand_size: cards dealt to each battle hand
    #[new]
    #[pyo3(signature = (seed = 42, opponent_challenges = true, battle_hand_size = 3))]
    fn new(seed: u64, opponent_challenges: bool, battle_hand_size: usize) -> PyResult<Self> {
        let config = MatchConfig::default()
            .with_seed(seed)
            .with_opponent_challenges(opponent_challenges)
            .with_battle_hand_size(battle_hand_size);
        Ok(Self {
            controller: MatchController::new(config).map_err(to_py_err)?,
        })
    }

    /// Restore a match, and the settings it was created with, from bytes
    /// produced by `save`.
    #[staticmethod]
    fn resume(data: &[u8]) -> PyResult<Self> {
        let controller = MatchController::resume(data).map_err(to_py_err)?;
        Ok(Self { controller })
    }

    fn save<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = self.controller.state().save().map_err(to_py_err)?;
        Ok(PyBytes::new_bound(py, &bytes))
    }

    fn new_match(&mut self) {
        self.controller.new_match();
    }

    fn reveal_turn(&mut self) -> PyResult<PyTurnOutcome> {
        self.controller.reveal_turn().map(PyTurnOutcome).map_err(to_py_err)
    }

    /// Returns `(challenge_card, None)` when accepted, `(None, outcome)` when
    /// the loss was committed.
    fn respond_to_challenge(&mut self, accept: bool) -> PyResult<(Option<PyCard>, Option<PyTurnOutcome>)> {
        match self.controller.respond_to_challenge(accept).map_err(to_py_err)? {
            ChallengeResponse::Accepted { challenge_card } => Ok((Some(PyCard(challenge_card)), None)),
            ChallengeResponse::Declined(outcome) => Ok((None, Some(PyTurnOutcome(outcome)))),
        }
    }

    fn submit_challenge_card(&mut self) -> PyResult<PyTurnOutcome> {
        self.controller
            .submit_challenge_card()
            .map(PyTurnOutcome)
            .map_err(to_py_err)
    }

    fn select_battle_card(&mut self, card: PyCard) -> PyResult<PyTurnOutcome> {
        self.controller
            .select_battle_card(card.0)
            .map(PyTurnOutcome)
            .map_err(to_py_err)
    }

    fn check_end_conditions(&mut self) -> bool {
        self.controller.check_end_conditions()
    }

    /// The player's dealt battle hand.
    fn battle_hand(&self) -> Vec<PyCard> {
        self.controller
            .battle_hand(Side::Player)
            .iter()
            .copied()
            .map(PyCard)
            .collect()
    }

    #[getter]
    fn phase(&self) -> String {
        self.controller.state().phase().to_string()
    }

    #[getter]
    fn message(&self) -> String {
        self.controller.message().to_string()
    }

    #[getter]
    fn winner(&self) -> Option<String> {
        side_name(self.controller.state().winner())
    }

    #[getter]
    fn player_may_act(&self) -> bool {
        self.controller.player_may_act()
    }

    #[getter]
    fn challenge_offered(&self) -> bool {
        self.controller.challenge_offered()
    }

    fn is_over(&self) -> bool {
        self.controller.state().is_over()
    }

    /// `(turn_number, player_cards, opponent_cards, discarded)`.
    fn stats(&self) -> (u32, usize, usize, usize) {
        let stats = self.controller.state().stats();
        (
            stats.turn_number,
            stats.player_card_count,
            stats.opponent_card_count,
            stats.discarded_card_count,
        )
    }

    fn __repr__(&self) -> String {
        let stats = self.controller.state().stats();
        format!(
            "Match(phase='{}', turn={}, player={}, opponent={})",
            self.controller.state().phase(),
            stats.turn_number,
            stats.player_card_count,
            stats.opponent_card_count
        )
    }
}
