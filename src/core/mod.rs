//! Core engine types: sides, match state, errors, RNG, configuration.
//!
//! Everything here is independent of the turn rules; the resolver and the
//! controller build on these types.

pub mod config;
pub mod error;
pub mod rng;
pub mod side;
pub mod state;

pub use config::MatchConfig;
pub use error::{EngineError, EngineResult};
pub use rng::{GameRng, GameRngState};
pub use side::{Side, SideMap};
pub use state::{ActiveTurn, BattleStaging, MatchState, MatchStats, PendingChallenge, Phase, Stake};
